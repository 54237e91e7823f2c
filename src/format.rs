pub fn short(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }

    let n_abs = n.abs();
    if n_abs < 10.0 {
        format!("{:.4}", n)
    } else if n_abs < 100.0 {
        format!("{:.3}", n)
    } else if n_abs < 1000.0 {
        format!("{:.2}", n)
    } else if n_abs < 10000.0 {
        format!("{:.1}", n)
    } else {
        format!("{:.0}", n)
    }
}

pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 1e2)
}

pub fn p_value(p: f64) -> String {
    if p.is_nan() {
        "NaN".to_owned()
    } else if p < 1e-4 {
        format!("{:.2e}", p)
    } else {
        format!("{:.4}", p)
    }
}

/// Format a number with thousands separators.
// Based on the corresponding libtest functionality, see
// https://github.com/rust-lang/rust/blob/557359f92512ca88b62a602ebda291f17a953002/library/test/src/bench.rs#L87-L109
fn thousands_sep(mut n: u64, sep: char) -> String {
    use std::fmt::Write;
    let mut output = String::new();
    let mut trailing = false;
    for &pow in &[9, 6, 3, 0] {
        let base = 10_u64.pow(pow);
        if pow == 0 || trailing || n / base != 0 {
            // Writing to a String cannot fail
            let _ = if !trailing {
                write!(output, "{}", n / base)
            } else {
                write!(output, "{:03}", n / base)
            };
            if pow != 0 {
                output.push(sep);
            }
            trailing = true;
        }
        n %= base;
    }

    output
}

/// Format a count, including thousands-separators.
pub fn integer(n: usize) -> String {
    thousands_sep(n as u64, ',')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_max_len() {
        let mut float = 1.0;
        while float < 999_999.9 {
            let string = short(float);
            println!("{}", string);
            assert!(string.len() <= 6);
            float *= 2.0;
        }
    }

    #[test]
    fn short_keeps_the_sign() {
        assert_eq!(short(-512.345), "-512.35");
        assert_eq!(short(f64::NAN), "NaN");
    }

    #[test]
    fn integer_thousands_sep() {
        assert_eq!(integer(140_352_319), "140,352,319");
        assert_eq!(integer(7), "7");
    }

    #[test]
    fn p_values() {
        assert_eq!(p_value(0.104_088), "0.1041");
        assert_eq!(p_value(0.000_012), "1.20e-5");
        assert_eq!(p_value(f64::NAN), "NaN");
    }
}
