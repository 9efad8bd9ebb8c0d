use std::path::Path;

use vgtimer_core::{Bindings, Config};

pub fn run(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(config);
    let bindings = Bindings::from_config(&config.bindings);
    for (action, stroke) in bindings.iter() {
        println!(
            "{:<8} {:<24} {}",
            action.config_key(),
            stroke.to_string(),
            action.trigger()
        );
    }
    Ok(())
}
