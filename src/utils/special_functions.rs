//! Bessel and Gamma functions needed for the closed-form beam profiles.
//!
//! `J0` and `J1` are summed from their power series for small arguments and obtained from
//! Miller's downward recurrence otherwise, both close to double precision. Higher integer
//! orders follow from the usual recurrences. The modified Bessel function accepts real
//! (e.g. half-integer) orders and is returned exponentially scaled.
use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];
const MILLER_ACC: f64 = 160.0;
const BIG_NO: f64 = 1.0e10;
const BIG_NI: f64 = 1.0e-10;
const MAX_SERIES_TERMS: usize = 2000;
const SERIES_LIMIT: f64 = 8.0;

fn lanczos_sum(x: f64) -> f64 {
    let mut a = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        a += c / (x + i);
    }
    a
}

/// Gamma function Γ(x) for real arguments (Lanczos approximation with reflection).
///
/// Returns a non-finite value at the poles (zero and negative integers).
#[must_use]
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        PI / ((PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let t = x + LANCZOS_G + 0.5;
        (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * lanczos_sum(x)
    }
}

/// Natural logarithm of Γ(x) for x > 0.
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let t = x + LANCZOS_G + 0.5;
        0.5f64.mul_add((2.0 * PI).ln(), (x + 0.5) * t.ln()) - t + lanczos_sum(x).ln()
    }
}

/// Power series of `J_n(x)`, used below the switch to Miller's recurrence.
fn bessel_j_series(n: u32, x: f64) -> f64 {
    let half_x = 0.5 * x;
    let mut term = (1..=n).fold(1.0, |t, k| t * half_x / f64::from(k));
    let mut sum = term;
    let quarter_x2 = half_x * half_x;
    for k in 1..MAX_SERIES_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let k = k as f64;
        term *= -quarter_x2 / (k * (k + f64::from(n)));
        sum += term;
        if term.abs() <= f64::EPSILON * 1.0e-2 && k > half_x.abs() {
            break;
        }
    }
    sum
}

/// `J0(x)` and `J1(x)` for `x > 0` from Miller's downward recurrence, normalized with
/// `J0 + 2 (J2 + J4 + ...) = 1`.
fn bessel_j01_miller(x: f64) -> (f64, f64) {
    let tox = 2.0 / x;
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let start = 2 * ((x + 20.0 + (MILLER_ACC * x).sqrt()) as u32 / 2 + 1);
    let mut bjp = 0.0;
    let mut bj = 1.0;
    let mut even_sum = 0.0;
    for j in (1..=start).rev() {
        let bjm = f64::from(j) * tox * bj - bjp;
        bjp = bj;
        bj = bjm;
        if bj.abs() > BIG_NO {
            bj *= BIG_NI;
            bjp *= BIG_NI;
            even_sum *= BIG_NI;
        }
        // bj now holds the (unnormalized) order j - 1
        if j > 1 && j % 2 == 1 {
            even_sum += bj;
        }
    }
    let norm = 2.0f64.mul_add(even_sum, bj);
    (bj / norm, bjp / norm)
}

/// Bessel function of the first kind of order 0.
#[must_use]
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < SERIES_LIMIT {
        bessel_j_series(0, ax)
    } else {
        bessel_j01_miller(ax).0
    }
}

/// Bessel function of the first kind of order 1.
#[must_use]
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < SERIES_LIMIT {
        bessel_j_series(1, x)
    } else if x < 0.0 {
        -bessel_j01_miller(ax).1
    } else {
        bessel_j01_miller(ax).1
    }
}

fn bessel_jn_unsigned(n: u32, x: f64) -> f64 {
    let ax = x.abs();
    if ax == 0.0 {
        return 0.0;
    }
    let tox = 2.0 / ax;
    let ans = if ax > f64::from(n) {
        // upward recurrence is stable above the turning point
        let mut bjm = bessel_j0(ax);
        let mut bj = bessel_j1(ax);
        for j in 1..n {
            let bjp = f64::from(j) * tox * bj - bjm;
            bjm = bj;
            bj = bjp;
        }
        bj
    } else {
        // Miller's downward recurrence, normalized with J0 + 2 (J2 + J4 + ...) = 1
        #[allow(clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        let start = 2 * ((n + (MILLER_ACC * f64::from(n)).sqrt() as u32) / 2);
        let mut use_for_sum = false;
        let mut bjp = 0.0;
        let mut ans = 0.0;
        let mut sum = 0.0;
        let mut bj = 1.0;
        for j in (1..=start).rev() {
            let bjm = f64::from(j) * tox * bj - bjp;
            bjp = bj;
            bj = bjm;
            if bj.abs() > BIG_NO {
                bj *= BIG_NI;
                bjp *= BIG_NI;
                ans *= BIG_NI;
                sum *= BIG_NI;
            }
            if use_for_sum {
                sum += bj;
            }
            use_for_sum = !use_for_sum;
            if j == n {
                ans = bjp;
            }
        }
        sum = 2.0f64.mul_add(sum, -bj);
        ans / sum
    };
    if x < 0.0 && n % 2 == 1 {
        -ans
    } else {
        ans
    }
}

/// Bessel function of the first kind `J_n(x)` of integer order `n`.
///
/// Negative orders use `J_{-n}(x) = (-1)^n J_n(x)`. `J_n(0)` is exactly zero for `n != 0`.
#[must_use]
pub fn bessel_jn(order: i32, x: f64) -> f64 {
    let n = order.unsigned_abs();
    let value = match n {
        0 => bessel_j0(x),
        1 => bessel_j1(x),
        _ => bessel_jn_unsigned(n, x),
    };
    if order < 0 && n % 2 == 1 {
        -value
    } else {
        value
    }
}

fn is_integer(value: f64) -> bool {
    value.fract() == 0.0
}

fn bessel_i_scaled_series(nu: f64, x: f64) -> f64 {
    let half_x = 0.5 * x;
    let (ln_gamma_abs, gamma_sign) = if nu + 1.0 > 0.0 {
        (ln_gamma(nu + 1.0), 1.0)
    } else {
        let g = gamma(nu + 1.0);
        (g.abs().ln(), g.signum())
    };
    let mut term = gamma_sign * (nu.mul_add(half_x.ln(), -ln_gamma_abs) - x).exp();
    let mut sum = term;
    let quarter_x2 = half_x * half_x;
    for k in 1..MAX_SERIES_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let k = k as f64;
        term *= quarter_x2 / (k * (k + nu));
        sum += term;
        if term.abs() <= f64::EPSILON * 0.1 * sum.abs() && k > half_x {
            break;
        }
    }
    sum
}

fn bessel_i_scaled_asymptotic(nu: f64, x: f64) -> f64 {
    let mu = 4.0 * nu * nu;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..30 {
        let k = f64::from(k);
        let two_k_minus_one = 2.0f64.mul_add(k, -1.0);
        let next = -term * (mu - two_k_minus_one * two_k_minus_one) / (8.0 * k * x);
        if next.abs() >= term.abs() && k > 1.0 {
            break;
        }
        term = next;
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
    }
    sum / (2.0 * PI * x).sqrt()
}

/// Exponentially scaled modified Bessel function of the first kind `e^{-x} I_ν(x)` for `x >= 0`.
///
/// The order `ν` may be any real number. At `x == 0` the result is `1` for `ν == 0`, `0` for
/// positive orders and infinite (with the sign of `1/Γ(ν+1)`) for negative non-integer orders.
/// Negative arguments are outside the domain and return NaN.
#[must_use]
pub fn bessel_i_scaled(nu: f64, x: f64) -> f64 {
    if x < 0.0 || x.is_nan() || nu.is_nan() {
        return f64::NAN;
    }
    // I_{-n} = I_n for integer orders
    let nu = if nu < 0.0 && is_integer(nu) { -nu } else { nu };
    if x == 0.0 {
        return if nu == 0.0 {
            1.0
        } else if nu > 0.0 {
            0.0
        } else {
            f64::INFINITY * gamma(nu + 1.0).signum()
        };
    }
    if x > 50.0 && x > nu * nu {
        bessel_i_scaled_asymptotic(nu, x)
    } else {
        bessel_i_scaled_series(nu, x)
    }
}
