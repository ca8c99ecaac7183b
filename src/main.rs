use clap::Parser;
use env_logger::Env;
use fsoptics::{
    console::{Args, PartialArgs},
    error::FsoResult,
    plottable::Plottable,
    scenario::{BeamScenario, FilmScenario, Scenario},
};
use log::info;
use std::path::Path;
use uom::si::length::millimeter;

fn create_plot(output_dir: &Path, f_name: &str, element: &dyn Plottable) -> FsoResult<()> {
    let f_path = output_dir.join(f_name);
    info!("writing {}", f_path.display());
    element.to_plot(&f_path, &element.plot_config())
}

fn run_beam(scenario: &BeamScenario, output_dir: &Path) -> FsoResult<()> {
    let result = scenario.evaluate()?;
    if let Some(radius) = result.intensity.rms_radius() {
        info!(
            "rms radius of the intensity distribution: {:.4} mm",
            radius.get::<millimeter>()
        );
    }
    create_plot(output_dir, "intensity.png", &result.intensity)?;
    create_plot(output_dir, "phase.png", &result.phase)?;
    if let Some(mask) = &result.mask {
        create_plot(output_dir, "mask.png", mask)?;
    }
    Ok(())
}

fn run_film(scenario: &FilmScenario, output_dir: &Path) -> FsoResult<()> {
    let spectrum = scenario.evaluate()?;
    println!("{spectrum}");
    create_plot(output_dir, "spectrum.png", &spectrum)
}

fn main() -> FsoResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    //parse CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;
    info!("reading scenario {}", args.scenario.display());
    match args.read_scenario()? {
        Scenario::Beam(beam) => run_beam(&beam, &args.output_dir),
        Scenario::Film(film) => run_film(&film, &args.output_dir),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fsoptics::error::FsoError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn run_beam_plots() {
        let dir = TempDir::new().unwrap();
        let Scenario::Beam(beam) = Scenario::from_string(
            "beam:
  kind: Iv
  charge: 3
  waist_mm: 1.0
  wavelength_nm: 633.0
  resolution: 32
  half_width_mm: 4.0
  mask: { radius_mm: 3.0 }
",
        )
        .unwrap() else {
            panic!("wrong scenario type");
        };
        // rendering text requires a system font, which is not available on every test machine
        match run_beam(&beam, dir.path()) {
            Ok(()) => {
                for f_name in ["intensity.png", "phase.png", "mask.png"] {
                    assert!(fs::metadata(dir.path().join(f_name)).is_ok());
                }
            }
            Err(e) => assert!(matches!(e, FsoError::Plot(_)), "{e}"),
        }
    }
    #[test]
    fn run_film_plot() {
        let dir = TempDir::new().unwrap();
        let Scenario::Film(film) = Scenario::from_string(
            "film:
  ambient: 1.0
  substrate: { n: 1.52 }
  polarization: S
  angle_deg: 20.0
  layers:
    - { thickness_nm: 100.0, n: 1.38 }
  sweep: { start_nm: 400.0, end_nm: 800.0, step_nm: 10.0 }
",
        )
        .unwrap() else {
            panic!("wrong scenario type");
        };
        match run_film(&film, dir.path()) {
            Ok(()) => assert!(dir.path().join("spectrum.png").exists()),
            Err(e) => assert!(matches!(e, FsoError::Plot(_)), "{e}"),
        }
    }
}
