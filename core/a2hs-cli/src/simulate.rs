//! `a2hs simulate`: replay a timed script on virtual time.

use std::rc::Rc;
use std::time::Duration;

use a2hs_core::controller::format_transition_trace;
use a2hs_core::{
    run_scenario, A2hsError, DismissalStore, FallbackMode, InstallController, ManualClock,
    PromptConfig, Result, Scenario, ScriptStep, StaticHost, StorageConfig, TriggerOutcome,
};
use tracing::info;

use crate::EnvironmentArgs;

pub struct SimulateOptions {
    pub config: PromptConfig,
    pub storage: StorageConfig,
    pub env: EnvironmentArgs,
    pub steps: Vec<ScriptStep>,
    pub timeout_ms: Option<u64>,
    pub on_demand: bool,
    pub until_ms: u64,
    pub persist: bool,
    pub json: bool,
}

pub fn run(options: SimulateOptions) -> Result<()> {
    let config = effective_config(&options);
    let host = build_host(&options.env);
    let store = if options.persist {
        DismissalStore::with_storage(&options.storage)
    } else {
        DismissalStore::in_memory()
    };
    let clock = ManualClock::new();

    let mut controller = InstallController::new(config, Rc::new(host), store, Rc::new(clock.clone()));
    info!(
        family = %controller.family(),
        steps = options.steps.len(),
        "Running install prompt simulation"
    );

    let scenario = Scenario::from_steps(options.steps);
    let report = run_scenario(
        &mut controller,
        &clock,
        &scenario,
        Duration::from_millis(options.until_ms),
    );

    if options.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| A2hsError::Json {
                context: "serializing simulation report".to_string(),
                source: e,
            })?;
        println!("{}", json);
        return Ok(());
    }

    println!("Platform: {}", controller.family());
    println!(
        "States:   {}",
        report
            .states
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    println!("{}", format_transition_trace(&report.transitions));
    for trigger in &report.triggers {
        match &trigger.outcome {
            TriggerOutcome::NativePrompt => println!("t={}ms trigger → native prompt", trigger.at_ms),
            TriggerOutcome::ManualInstructions { instructions } => {
                println!("t={}ms trigger → manual instructions", trigger.at_ms);
                for line in instructions.render().lines() {
                    println!("    {}", line);
                }
            }
            TriggerOutcome::Unavailable => println!("t={}ms trigger → nothing to show", trigger.at_ms),
        }
    }
    println!("Native prompts shown: {}", report.native_prompts);
    println!("Final state: {}", report.final_state);
    Ok(())
}

fn effective_config(options: &SimulateOptions) -> PromptConfig {
    let mut config = options.config.clone();
    if options.on_demand {
        config.fallback_mode = FallbackMode::OnDemand;
    }
    if let Some(ms) = options.timeout_ms {
        config.fallback_mode = FallbackMode::Timed;
        config.fallback_timeout_ms = ms;
    }
    config
}

pub(crate) fn build_host(env: &EnvironmentArgs) -> StaticHost {
    let host = StaticHost::browser(&env.user_agent);
    host.standalone.set(env.standalone);
    host.install_api.set(!env.no_install_api);
    host
}
