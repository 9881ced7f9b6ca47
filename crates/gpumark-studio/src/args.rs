use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use pico_args::Arguments;

use gpumark_scenes::SceneKind;

pub const USAGE: &str = "usage: gpumark [SCENE] [--samples N] [--seed N] [--size WxH] \
                         [--mesh PATH] [--no-vsync] [--list]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub scene: SceneKind,
    pub samples: Option<usize>,
    pub seed: u64,
    pub size: Option<(u32, u32)>,
    pub mesh: Option<PathBuf>,
    pub no_vsync: bool,
    pub list: bool,
    pub help: bool,
}

impl Args {
    /// Parses arguments, excluding the program name.
    pub fn parse(args: Vec<OsString>) -> Result<Self> {
        let mut args = Arguments::from_vec(args);

        let help = args.contains(["-h", "--help"]);
        let list = args.contains("--list");
        let no_vsync = args.contains("--no-vsync");
        let samples = args.opt_value_from_fn("--samples", parse_samples)?;
        let seed = args.opt_value_from_str("--seed")?.unwrap_or(0);
        let size = args.opt_value_from_fn("--size", parse_size)?;
        let mesh = args.opt_value_from_str("--mesh")?;

        let scene = args
            .opt_free_from_str::<SceneKind>()
            .context("invalid scene")?
            .unwrap_or(SceneKind::Animometer);

        let rest = args.finish();
        if let Some(arg) = rest.first() {
            bail!("unexpected argument '{}'", arg.to_string_lossy());
        }

        Ok(Self {
            scene,
            samples,
            seed,
            size,
            mesh,
            no_vsync,
            list,
            help,
        })
    }
}

/// At least one sample; a run has to measure something.
fn parse_samples(s: &str) -> Result<usize> {
    let n: usize = s.parse().with_context(|| format!("invalid sample count '{s}'"))?;
    ensure!(n > 0, "--samples must be at least 1");
    Ok(n)
}

/// Parses `WxH` (also accepts `X`), both sides non-zero.
fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("invalid size '{s}', expected WxH"))?;
    let w: u32 = w.trim().parse().with_context(|| format!("invalid width in '{s}'"))?;
    let h: u32 = h.trim().parse().with_context(|| format!("invalid height in '{s}'"))?;
    ensure!(w > 0 && h > 0, "size must be non-zero, got '{s}'");
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(OsString::from).collect())
    }

    #[test]
    fn no_args_runs_animometer() {
        let a = parse(&[]).unwrap();
        assert_eq!(a.scene, SceneKind::Animometer);
        assert_eq!(a.samples, None);
        assert_eq!(a.seed, 0);
        assert_eq!(a.size, None);
        assert_eq!(a.mesh, None);
        assert!(!a.no_vsync && !a.list && !a.help);
    }

    #[test]
    fn full_command_line() {
        let a = parse(&["cube", "--samples", "10", "--seed", "7", "--size", "800x600", "--no-vsync"])
            .unwrap();
        assert_eq!(a.scene, SceneKind::Cube);
        assert_eq!(a.samples, Some(10));
        assert_eq!(a.seed, 7);
        assert_eq!(a.size, Some((800, 600)));
        assert!(a.no_vsync);
        assert!(!a.list);
    }

    #[test]
    fn options_before_scene() {
        let a = parse(&["--list", "boids"]).unwrap();
        assert!(a.list);
        assert_eq!(a.scene, SceneKind::ComputeBoids);
    }

    #[test]
    fn shading_takes_a_mesh_path() {
        let a = parse(&["shading", "--mesh", "data/shading.data"]).unwrap();
        assert_eq!(a.scene, SceneKind::Shading);
        assert_eq!(a.mesh, Some(PathBuf::from("data/shading.data")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["teapot"]).is_err());
        assert!(parse(&["cube", "triangle"]).is_err());
        assert!(parse(&["--samples"]).is_err());
        assert!(parse(&["--samples", "many"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["cube", "--frobnicate"]).is_err());
    }

    #[test]
    fn zero_samples_is_rejected() {
        assert!(parse(&["--samples", "0"]).is_err());
        assert!(parse_samples("0").is_err());
        assert_eq!(parse_samples("1").unwrap(), 1);
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
        assert!(parse_size("axb").is_err());
    }
}
