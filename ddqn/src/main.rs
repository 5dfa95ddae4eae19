use anyhow::Result;
use clap::Parser;
use ddqn::DdqnCatchConfig;
use ddqn_candle_agent::Device;
use ddqn_core::record::{AggregateRecorder, NullRecorder};
use ddqn_tensorboard::TensorboardRecorder;
use std::path::PathBuf;

/// Train a double DQN agent on the catch game
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the configuration; defaults are used if not given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of TensorBoard logs; nothing is recorded if not given
    #[arg(short, long)]
    logdir: Option<PathBuf>,

    /// Overrides the number of frames
    #[arg(long)]
    max_frames: Option<usize>,

    /// Overrides the seed of the environment
    #[arg(long)]
    seed: Option<i64>,

    /// Train on the given CUDA device
    #[arg(long)]
    cuda: Option<usize>,

    /// Print the configuration and exit
    #[arg(long, default_value_t = false)]
    show_config: bool,

    /// Save the configuration into the given YAML file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn create_config(args: &Args) -> Result<DdqnCatchConfig> {
    let mut config = match &args.config {
        Some(path) => DdqnCatchConfig::load(path)?,
        None => DdqnCatchConfig::default(),
    };
    if let Some(v) = args.max_frames {
        config.trainer_config = config.trainer_config.max_frames(v);
    }
    if let Some(v) = args.seed {
        config.env_seed = v;
    }
    if let Some(n) = args.cuda {
        config.agent_config = config.agent_config.device(Device::Cuda(n));
    }
    Ok(config)
}

fn create_recorder(args: &Args) -> Box<dyn AggregateRecorder> {
    match &args.logdir {
        Some(logdir) => Box::new(TensorboardRecorder::new(logdir)),
        None => Box::new(NullRecorder::new()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = create_config(&args)?;

    if args.show_config {
        println!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    if let Some(path) = &args.save_config {
        config.save(path)?;
        return Ok(());
    }

    let mut recorder = create_recorder(&args);
    ddqn::train(&config, recorder.as_mut())?;

    Ok(())
}
