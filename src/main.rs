use tracing_subscriber::EnvFilter;

use heatwall::cli::{Cli, RenderKind, Role};
use heatwall::coordinator::{Coordinator, CoordinatorConfig};
use heatwall::error::Result;
use heatwall::model::{demo_pattern, wall_pattern, EquationFactory, Parameters};
use heatwall::render::{render_tile, NullRender, RenderSink, TermRender};
use heatwall::worker::{self, WorkerConfig};

fn main() {
    let cli = Cli::from_args();
    init_tracing(cli.verbose);
    if let Err(e) = cli.validate_parameters() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "heatwall=debug" } else { "heatwall=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match cli.role {
        Role::Local => match cli.render {
            RenderKind::Term => run_local(cli, TermRender::new(cli.width, cli.height)),
            RenderKind::Null => run_local(cli, NullRender),
        },
        Role::Coordinator => {
            let config = CoordinatorConfig {
                expected: cli.layout().worker_count(),
                equation: cli.equation.as_wire().to_string(),
                width: cli.width,
                height: cli.height,
                initial: wall_pattern(cli.width, cli.height),
                steps: cli.steps,
            };
            Coordinator::bind(&cli.addr, config)?.run()
        }
        Role::Worker => {
            let config = WorkerConfig {
                id: cli.worker_id()?,
                layout: cli.layout(),
                diffusion: cli.diffusion,
            };
            match cli.render {
                RenderKind::Term => {
                    worker::run(&cli.addr, &config, TermRender::new).map(drop)
                }
                RenderKind::Null => {
                    worker::run(&cli.addr, &config, |_, _| NullRender).map(drop)
                }
            }
        }
    }
}

/// The single-process demo: one equation over the whole grid, no networking.
fn run_local<S: RenderSink>(cli: &Cli, mut sink: S) -> Result<()> {
    let params = Parameters::new(cli.width, cli.height, cli.diffusion);
    params.validate()?;
    params.warn();
    let initial = demo_pattern(cli.width, cli.height);
    let mut equation = EquationFactory::create(cli.equation.as_wire(), params, initial)?;
    let mut frame = 0usize;
    loop {
        render_tile(&equation, cli.width, cli.height, &mut sink);
        equation.advance(1.0);
        frame += 1;
        if cli.steps != 0 && frame == cli.steps {
            return Ok(());
        }
    }
}
