//! Translation backend administration: model and temperature selection.

use anyhow::Result;
use async_trait::async_trait;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::{CommandMetadata, ParamKind, ParameterSpec};

fn temperature_validator(value: &str) -> Result<(), String> {
    let temp: f64 = value.parse().map_err(|_| "not a number".to_string())?;
    if !(0.0..=1.0).contains(&temp) {
        return Err("temperature must be between 0.0 and 1.0".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// /setmodel
// ---------------------------------------------------------------------------

pub struct SetModelCommand {
    meta: CommandMetadata,
}

impl SetModelCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "setmodel".to_string(),
            description: "Set the translation AI model".to_string(),
            category: "Admin".to_string(),
            usage: "/setmodel <model-id>".to_string(),
            require_owner: true,
            examples: vec![
                "/setmodel gemini-2.0-flash".to_string(),
                "/setmodel gemini-2.5-flash".to_string(),
            ],
            parameters: vec![ParameterSpec::new(
                "model",
                ParamKind::String,
                "Model ID (e.g., gemini-2.0-flash)",
            )
            .required()],
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for SetModelCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SetModelCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let Some(model_id) = ctx.args.first() else {
            return ctx.respond(&response::error("Please specify a model ID")).await;
        };
        if let Err(err) = ctx.caps.translator.set_model(model_id) {
            return ctx
                .respond(&response::error(&format!("Failed to set model: {err}")))
                .await;
        }
        ctx.respond(&response::success(&format!("Translation model set to: {model_id}")))
            .await
    }
}

// ---------------------------------------------------------------------------
// /getmodel
// ---------------------------------------------------------------------------

pub struct GetModelCommand {
    meta: CommandMetadata,
}

impl GetModelCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "getmodel".to_string(),
            description: "Get current translation model".to_string(),
            category: "Admin".to_string(),
            usage: "/getmodel".to_string(),
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for GetModelCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for GetModelCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let model = ctx.caps.translator.model();
        ctx.respond(&response::info(&format!("Current translation model: {model}")))
            .await
    }
}

// ---------------------------------------------------------------------------
// /settemp
// ---------------------------------------------------------------------------

pub struct SetTempCommand {
    meta: CommandMetadata,
}

impl SetTempCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "settemp".to_string(),
            description: "Set AI temperature (0.0-1.0)".to_string(),
            category: "Admin".to_string(),
            usage: "/settemp <temperature>".to_string(),
            require_owner: true,
            examples: vec!["/settemp 0.7".to_string(), "/settemp 0.3".to_string()],
            parameters: vec![ParameterSpec::new(
                "temperature",
                ParamKind::Float,
                "Temperature value between 0.0 and 1.0",
            )
            .required()
            .validator(temperature_validator)],
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for SetTempCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SetTempCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let params = match crate::params::parse_parameters(&self.meta.parameters, &ctx.args) {
            Ok(params) => params,
            Err(err) => return ctx.respond(&response::error(&err.to_string())).await,
        };
        // Present: the parameter is required and validated above.
        let Some(temp) = params.get("temperature").and_then(|v| v.as_float()) else {
            return ctx.respond(&response::error("Please specify a temperature value")).await;
        };
        if let Err(err) = ctx.caps.translator.set_temperature(temp) {
            return ctx
                .respond(&response::error(&format!("Failed to set temperature: {err}")))
                .await;
        }
        ctx.respond(&response::success(&format!("Temperature set to: {temp:.1}")))
            .await
    }
}

// ---------------------------------------------------------------------------
// /gettemp
// ---------------------------------------------------------------------------

pub struct GetTempCommand {
    meta: CommandMetadata,
}

impl GetTempCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "gettemp".to_string(),
            description: "Get current AI temperature".to_string(),
            category: "Admin".to_string(),
            usage: "/gettemp".to_string(),
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for GetTempCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for GetTempCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let temp = ctx.caps.translator.temperature();
        ctx.respond(&response::info(&format!("Current temperature: {temp:.1}")))
            .await
    }
}
