#![warn(missing_docs)]
//! Module for uom macros that facilitate the creation of single unit values or vectors of them
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {
    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
    ($unit:ident, $unit_type:ident, $( $x:expr ),*) => {
        {
            use std::vec::Vec;
            let mut temp_vec = Vec::new();
            $(
                temp_vec.push($unit_type::new::<$unit>($x));
            )*
            temp_vec
        }
    };
}

///macro to create a Length in meter
#[macro_export]
macro_rules! meter {
    ($( $x:expr ),*) =>{
        {
            use uom::si::{f64::Length, length::meter};
            $crate::uom_unit_creator![meter, Length, $( $x ),*]
        }
    };
}
///macro to create a Length in millimeter
#[macro_export]
macro_rules! millimeter {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::millimeter};
        $crate::uom_unit_creator![millimeter, Length, $( $x ),*]
    }};
}
///macro to create a Length in micrometer
#[macro_export]
macro_rules! micrometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::micrometer};
        $crate::uom_unit_creator![micrometer, Length, $( $x ),*]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_unit_creator![nanometer, Length, $( $x ),*]
    }};
}
///macro to create an angle in radian
#[macro_export]
macro_rules! radian {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Angle, angle::radian};
        $crate::uom_unit_creator![radian, Angle, $( $x ),*]
    }};
}
///macro to create an angle in degree
#[macro_export]
macro_rules! degree {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Angle, angle::degree};
        $crate::uom_unit_creator![degree, Angle, $( $x ),*]
    }};
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use uom::si::{
        angle::{degree, radian},
        f64::{Angle, Length},
        length::{meter, millimeter, nanometer},
    };
    #[test]
    fn single_values() {
        assert_relative_eq!(meter!(1.5).get::<meter>(), 1.5);
        assert_relative_eq!(millimeter!(2.0).get::<meter>(), 2.0e-3);
        assert_relative_eq!(nanometer!(633.0).get::<nanometer>(), 633.0);
        assert_relative_eq!(micrometer!(1.0).get::<millimeter>(), 1.0e-3);
        assert_relative_eq!(degree!(180.0).get::<radian>(), std::f64::consts::PI);
        assert_relative_eq!(radian!(1.0).get::<radian>(), 1.0);
    }
    #[test]
    fn vectors() {
        let lengths: Vec<Length> = millimeter!(1.0, 2.0, 3.0);
        assert_eq!(lengths.len(), 3);
        assert_relative_eq!(lengths[2].get::<millimeter>(), 3.0);
        let angles: Vec<Angle> = degree!(0.0, 90.0);
        assert_relative_eq!(angles[1].get::<degree>(), 90.0);
    }
}
