mod args;

use std::process::ExitCode;

use anyhow::Result;
use winit::dpi::LogicalSize;

use gpumark_engine::device::GpuInit;
use gpumark_engine::logging::{LoggingConfig, init_logging};
use gpumark_engine::window::{Runtime, RuntimeConfig};
use gpumark_scenes::{RunnerConfig, SceneKind, SceneOptions, SceneRunner};

use args::{Args, USAGE};

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args_os().skip(1).collect()) {
        Ok(a) => a,
        Err(err) => {
            eprintln!("gpumark: {err:#}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    if args.list {
        for kind in SceneKind::ALL {
            println!("{:<12} {}", kind.name(), kind.description());
        }
        return ExitCode::SUCCESS;
    }

    init_logging(LoggingConfig::default());

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut runtime = RuntimeConfig {
        title: format!("gpumark - {}", args.scene),
        ..RuntimeConfig::default()
    };
    if let Some((w, h)) = args.size {
        runtime.initial_size = LogicalSize::new(w as f64, h as f64);
    }

    let gpu_init = GpuInit {
        present_mode: if args.no_vsync {
            wgpu::PresentMode::AutoNoVsync
        } else {
            wgpu::PresentMode::Fifo
        },
        ..GpuInit::default()
    };

    let runner = SceneRunner::new(RunnerConfig {
        scene: args.scene,
        options: SceneOptions {
            seed: args.seed,
            mesh: args.mesh,
        },
        target_samples: args.samples,
        ..RunnerConfig::default()
    });

    log::info!("running '{}' (seed {})", args.scene, args.seed);
    let report = Runtime::run(runtime, gpu_init, runner)?.into_report()?;

    if let Some(adapter) = &report.adapter {
        log::info!("{} on {adapter}", report.scene);
    }
    match report.summary {
        Some(summary) => log::info!("{}: {summary}", report.scene),
        None => log::warn!("{}: no FPS samples collected", report.scene),
    }
    Ok(())
}
