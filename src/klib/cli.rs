use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(name = "kluster")]
#[command(about = "Lloyd's k-means over synthetic points")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

pub trait KernelParams: std::fmt::Debug {
    fn validate(&self) -> bool;
    fn debug(&self) -> bool;
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Single-process kernel", allow_negative_numbers = true)]
    Seq(KernelArgs),

    #[command(about = "Data-parallel kernel over worker threads", allow_negative_numbers = true)]
    Par(ParArgs),
}

#[derive(clap::Args, Clone, Debug)]
pub struct KernelArgs {
    /// Number of points to generate
    #[arg(value_parser = parse_count)]
    pub npoints: usize,

    /// Coordinates per point
    #[arg(value_parser = parse_count)]
    pub dimension: usize,

    /// Number of clusters
    #[arg(value_parser = parse_count)]
    pub ncentroids: usize,

    /// Distance threshold below which a point counts as settled
    #[arg(value_parser = parse_float)]
    pub mindistance: f32,

    /// Generator seed
    #[arg(value_parser = parse_seed)]
    pub seed: i32,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ParArgs {
    #[command(flatten)]
    pub kernel: KernelArgs,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,
}

impl KernelParams for KernelArgs {
    fn debug(&self) -> bool {
        self.debug
    }

    fn validate(&self) -> bool {
        if self.npoints == 0 {
            warn!("npoints is 0, output will be empty");
        }
        if self.ncentroids == 0 {
            warn!("ncentroids is 0, nothing will be clustered");
        }
        true
    }
}

impl KernelParams for ParArgs {
    fn debug(&self) -> bool {
        self.kernel.debug
    }

    fn validate(&self) -> bool {
        let mut is_ok = self.kernel.validate();

        if self.workers < 1 {
            error!("--workers must be at least 1");
            is_ok = false;
        }

        if self.workers > self.kernel.npoints.max(1) {
            warn!("more workers than points, most partitions will be empty");
        }

        is_ok
    }
}

/// atoi-style leniency: leading whitespace, optional sign, longest
/// digit prefix; everything else reads as 0. Negative counts clamp
/// to 0 rather than wrapping into a huge allocation.
fn parse_count(s: &str) -> Result<usize, std::convert::Infallible> {
    Ok(atoi(s).max(0) as usize)
}

fn parse_seed(s: &str) -> Result<i32, std::convert::Infallible> {
    Ok(atoi(s) as i32)
}

/// strtof-style leniency: longest prefix that reads as a float,
/// otherwise 0.
fn parse_float(s: &str) -> Result<f32, std::convert::Infallible> {
    let s = s.trim_start();
    for end in (1..=s.len()).rev() {
        if !s.is_char_boundary(end) {
            continue;
        }
        if let Ok(v) = s[..end].parse::<f32>() {
            return Ok(v);
        }
    }
    Ok(0.0)
}

fn atoi(s: &str) -> i64 {
    let mut chars = s.trim_start().chars().peekable();
    let mut negative = false;
    if let Some(&c) = chars.peek() {
        if c == '+' || c == '-' {
            negative = c == '-';
            chars.next();
        }
    }
    let mut value: i64 = 0;
    for c in chars {
        match c.to_digit(10) {
            Some(d) => value = value.saturating_mul(10).saturating_add(d as i64),
            None => break,
        }
    }
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_parsing_is_lenient() {
        assert_eq!(parse_count("42"), Ok(42));
        assert_eq!(parse_count("  17"), Ok(17));
        assert_eq!(parse_count("12abc"), Ok(12));
        assert_eq!(parse_count("abc"), Ok(0));
        assert_eq!(parse_count("-5"), Ok(0));
        assert_eq!(parse_count(""), Ok(0));
    }

    #[test]
    fn seed_parsing_keeps_sign() {
        assert_eq!(parse_seed("-3"), Ok(-3));
        assert_eq!(parse_seed("+9"), Ok(9));
        assert_eq!(parse_seed("x"), Ok(0));
    }

    #[test]
    fn float_parsing_is_lenient() {
        assert_eq!(parse_float("0.5"), Ok(0.5));
        assert_eq!(parse_float("1e3"), Ok(1000.0));
        assert_eq!(parse_float("2.5garbage"), Ok(2.5));
        assert_eq!(parse_float("garbage"), Ok(0.0));
        assert_eq!(parse_float("-0.25"), Ok(-0.25));
    }
}
