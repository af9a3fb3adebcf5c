use std::ffi::{OsStr, OsString};

use anyhow::{anyhow, bail, Context, Result};

use crate::world_core::config::GameConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct RunArgs {
    pub ticks: u64,
    pub seed: Option<u32>,
    pub dt: f32,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            ticks: 3600,
            seed: None,
            dt: 1.0 / 60.0,
        }
    }
}

impl RunArgs {
    pub fn from_env_args() -> Result<Self> {
        Self::from_iter(
            std::env::args_os().skip(1),
            std::env::var_os("SIDESCROLL_TICKS"),
        )
    }

    fn from_iter<I>(args: I, env_ticks: Option<OsString>) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut parsed = Self::default();

        if let Some(ticks) = env_ticks.as_deref() {
            parsed.ticks = parse_value(ticks, "SIDESCROLL_TICKS")?;
        }

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg_str = arg.to_string_lossy();
            match arg_str.as_ref() {
                "--ticks" => parsed.ticks = parse_value(&next_value(&mut iter, "--ticks")?, "--ticks")?,
                "--seed" => parsed.seed = Some(parse_value(&next_value(&mut iter, "--seed")?, "--seed")?),
                "--dt" => parsed.dt = parse_value(&next_value(&mut iter, "--dt")?, "--dt")?,
                other => log::warn!("ignoring unknown argument {other}"),
            }
        }

        if !(parsed.dt.is_finite() && parsed.dt > 0.0) {
            bail!("--dt must be a positive number of seconds, got {}", parsed.dt);
        }

        Ok(parsed)
    }

    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
    }
}

fn next_value(iter: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<OsString> {
    iter.next().ok_or_else(|| anyhow!("{flag} requires a value"))
}

fn parse_value<T>(value: &OsStr, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .to_string_lossy()
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {name}: {:?}", value))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::RunArgs;
    use crate::world_core::config::GameConfig;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn defaults_run_one_minute() {
        let parsed = RunArgs::from_iter(Vec::<OsString>::new(), None).unwrap();
        assert_eq!(parsed, RunArgs::default());
        assert_eq!(parsed.ticks, 3600);
    }

    #[test]
    fn cli_flags_are_parsed() {
        let parsed =
            RunArgs::from_iter(args(&["--ticks", "120", "--seed", "7", "--dt", "0.02"]), None)
                .unwrap();
        assert_eq!(parsed.ticks, 120);
        assert_eq!(parsed.seed, Some(7));
        assert!((parsed.dt - 0.02).abs() < 1e-6);

        let mut config = GameConfig::default();
        parsed.apply(&mut config);
        assert_eq!(config.world.seed, 7);
    }

    #[test]
    fn env_ticks_yield_to_cli() {
        let from_env = RunArgs::from_iter(Vec::<OsString>::new(), Some("90".into())).unwrap();
        assert_eq!(from_env.ticks, 90);

        let overridden = RunArgs::from_iter(args(&["--ticks", "10"]), Some("90".into())).unwrap();
        assert_eq!(overridden.ticks, 10);
    }

    #[test]
    fn missing_and_bad_values_are_errors() {
        assert!(RunArgs::from_iter(args(&["--ticks"]), None).is_err());
        assert!(RunArgs::from_iter(args(&["--seed", "abc"]), None).is_err());
        assert!(RunArgs::from_iter(args(&["--dt", "0"]), None).is_err());
        assert!(RunArgs::from_iter(Vec::<OsString>::new(), Some("lots".into())).is_err());
    }
}
