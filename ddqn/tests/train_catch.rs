use anyhow::Result;
use ddqn::{catch::CatchEnvConfig, DdqnCatchConfig};
use ddqn_candle_agent::Device;
use ddqn_core::{
    error::DdqnError, record::BufferedRecorder, replay_buffer::SimpleReplayBufferConfig,
    EpsilonSchedule,
};
use tempdir::TempDir;

fn small_config() -> DdqnCatchConfig {
    let mut config = DdqnCatchConfig::new(CatchEnvConfig::default(), Device::Cpu);
    config.agent_config = config.agent_config.batch_size(4);
    config.replay_buffer_config = SimpleReplayBufferConfig::default().capacity(200);
    config.trainer_config = config
        .trainer_config
        .max_frames(100)
        .warmup_period(12)
        .target_update_interval(25)
        .log_interval(50)
        .flush_record_interval(50)
        .epsilon(EpsilonSchedule::default().eps_decay(50.0));
    config
}

#[test]
fn test_train_catch() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = small_config();
    let mut recorder = BufferedRecorder::new();
    let history = ddqn::train(&config, &mut recorder)?;

    // Optimization starts once the buffer holds 13 transitions.
    assert_eq!(history.losses.len(), 100 - 12);
    assert!(history.losses.iter().all(|l| l.is_finite()));

    // An episode is 11 frames long.
    assert_eq!(history.episode_rewards.len(), 100 / 11);
    assert!(history
        .episode_rewards
        .iter()
        .all(|r| *r == 1.0 || *r == -1.0));

    assert_eq!(recorder.len(), 2);
    for record in recorder.iter() {
        assert!(record.get_scalar("epsilon").is_ok());
        assert!(record.get_scalar("step").is_ok());
    }
    Ok(())
}

#[test]
fn test_train_catch_from_yaml() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new("train_catch")?;
    let path = dir.path().join("config.yaml");
    let config = small_config();
    config.save(&path)?;

    let mut config = DdqnCatchConfig::load(&path)?;
    config.trainer_config = config.trainer_config.max_frames(30);
    let history = ddqn::train(&config, &mut BufferedRecorder::new())?;
    assert_eq!(history.losses.len(), 30 - 12);
    Ok(())
}

#[test]
fn test_warmup_shorter_than_batch_fails_before_training() -> Result<()> {
    let mut config = DdqnCatchConfig::default();
    config.trainer_config = config.trainer_config.max_frames(40).warmup_period(10);

    let mut recorder = BufferedRecorder::new();
    let err = ddqn::train(&config, &mut recorder).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DdqnError>(),
        Some(DdqnError::InvalidConfig(_))
    ));
    assert!(recorder.is_empty());
    Ok(())
}
