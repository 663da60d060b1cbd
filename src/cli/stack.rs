//! Stack synthesis commands

use crate::cli::display::{table::StackInfo, TableRenderer};
use crate::domain::config::{
    apply_to_stack_config, non_empty, normalize_domain, parse_dynamic_configs, StackConfig,
};
use crate::domain::stack::{App, AssetStoreStack, Environment};
use crate::infrastructure::aws::lookup::{
    ChainedZoneProvider, ContextFileZoneProvider, StaticZoneProvider, ZoneQuery,
};
use crate::infrastructure::aws::plan::{load_previous_template, Plan};
use crate::infrastructure::aws::template::{write_assembly, TemplateFormat, TemplateSynthesizer};
use crate::infrastructure::constants::{DEFAULT_OUT_DIR, ENV_CONF_FILE};
use crate::shared::error::StackError;
use clap::{Args, Parser};
use std::path::{Path, PathBuf};

/// Flags shared by every command that defines the stack
#[derive(Args, Debug, Clone, Default)]
pub struct StackArgs {
    /// Path to stack configuration file (TOML)
    /// If not provided, reads ASSET_STORE_CONF_FILE or falls back to defaults
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,

    /// Primary domain; the zone of the same name must already exist
    #[arg(long)]
    pub domain: Option<String>,

    /// Target account id (12 digits)
    #[arg(long)]
    pub account: Option<String>,

    /// Target region
    #[arg(long)]
    pub region: Option<String>,

    /// Hosted zone id; skips the context file lookup
    #[arg(long)]
    pub zone_id: Option<String>,

    /// Lookup context file holding cached hosted zone ids
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<String>,

    /// Dynamic configuration properties to override any settings (-D key=value)
    ///
    /// Stack: stack.name, stack.domain-name, stack.asset-subdomain, stack.bucket-name,
    /// stack.context-file, stack.removal-profile (disposable | retain)
    /// Environment: env.account, env.region
    /// Zone: zone.hosted-zone-id
    ///
    /// Example: -Dstack.asset-subdomain=static -Dstack.removal-profile=retain
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl StackArgs {
    /// Priority: -D > command line > environment > config file > defaults
    pub fn resolve_config(&self) -> anyhow::Result<StackConfig> {
        let mut conf = if let Some(ref config_path) = self.config_file {
            StackConfig::from(config_path)?
        } else if let Ok(env_path) = std::env::var(ENV_CONF_FILE) {
            StackConfig::from(&env_path)?
        } else {
            tracing::info!("no configuration file specified, using default settings");
            StackConfig::default()
        };

        conf.apply_env();

        if let Some(ref domain) = self.domain {
            conf.domain_name = normalize_domain(domain);
        }
        if let Some(ref account) = self.account {
            conf.env.account = Some(account.clone());
        }
        if let Some(ref region) = self.region {
            conf.env.region = Some(region.clone());
        }
        if let Some(ref zone_id) = self.zone_id {
            conf.zone.hosted_zone_id = non_empty(zone_id.trim());
        }
        if let Some(ref context_file) = self.context_file {
            conf.context_file = context_file.clone();
        }

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_stack_config(&dynamic_configs, &mut conf)?;
        }

        conf.validate()?;
        Ok(conf)
    }

    /// A pinned zone id wins over the context file
    pub fn zone_provider(conf: &StackConfig) -> ChainedZoneProvider {
        let mut chain = ChainedZoneProvider::new();
        if let Some(ref zone_id) = conf.zone.hosted_zone_id {
            chain = chain.push(Box::new(
                StaticZoneProvider::new().with_zone(&conf.domain_name, zone_id),
            ));
        }
        chain.push(Box::new(ContextFileZoneProvider::new(&conf.context_file)))
    }

    pub async fn define(&self) -> anyhow::Result<(App, AssetStoreStack)> {
        let conf = self.resolve_config()?;
        let zones = Self::zone_provider(&conf);

        let mut app = App::new();
        let defined = AssetStoreStack::define(&mut app, &conf, &zones)
            .await
            .map_err(|e| match e {
                StackError::ZoneNotFound { .. } => {
                    let query = ZoneQuery::new(
                        &conf.domain_name,
                        &Environment::from(&conf.env),
                    );
                    anyhow::anyhow!(
                        "{}\n\n  Pass --zone-id, or add the lookup to {}:\n  \"{}\": {{\"Id\": \"<zone id>\", \"Name\": \"{}.\"}}",
                        e,
                        conf.context_file,
                        query.context_key(),
                        query.domain_name
                    )
                }
                other => anyhow::anyhow!("Failed to define stack: {}", other),
            })?;
        Ok((app, defined))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SynthCommand {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Output directory for templates and the manifest
    #[arg(long, short = 'o', default_value = DEFAULT_OUT_DIR)]
    pub out: String,

    /// Template format (json, yaml)
    #[arg(long, default_value = "json")]
    pub format: String,
}

impl Default for SynthCommand {
    fn default() -> Self {
        Self {
            stack: StackArgs::default(),
            out: DEFAULT_OUT_DIR.to_string(),
            format: "json".to_string(),
        }
    }
}

impl SynthCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let format = self
            .format
            .parse::<TemplateFormat>()
            .map_err(|e| anyhow::anyhow!("Invalid format: {}", e))?;
        let (app, _) = self.stack.define().await?;

        let written = write_assembly(&app, Path::new(&self.out), format)
            .map_err(|e| anyhow::anyhow!("Synthesis failed: {}", e))?;

        for path in &written {
            println!("✓ {}", path.display());
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Previously deployed template (JSON or YAML) to diff against
    #[arg(long, value_name = "TEMPLATE")]
    pub previous: Option<PathBuf>,

    /// Print the plan as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl PlanCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let (app, defined) = self.stack.define().await?;
        let stack = app
            .stack(&defined.stack_name)
            .ok_or_else(|| anyhow::anyhow!("Stack {} was not registered", defined.stack_name))?;

        let template = TemplateSynthesizer::new(stack).synthesize()?;
        let previous = match self.previous {
            Some(ref path) => Some(load_previous_template(path).map_err(|e| {
                anyhow::anyhow!("Failed to load previous template {}: {}", path.display(), e)
            })?),
            None => None,
        };

        let plan = Plan::build(stack, &template, previous.as_ref())?;
        tracing::debug!(
            stack = %plan.stack_name,
            changed = TableRenderer::changed_actions(&plan),
            "plan built"
        );
        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", TableRenderer::new().render_plan(&plan));
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    pub stack: StackArgs,
}

impl ListCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let (app, _) = self.stack.define().await?;

        let mut infos = Vec::new();
        for stack in app.stacks() {
            let template = TemplateSynthesizer::new(stack).synthesize()?;
            infos.push(StackInfo {
                name: stack.name.clone(),
                environment: stack.environment.to_uri(),
                resources: template.resources.len(),
                outputs: template.outputs.iter().map(|(name, _)| name.clone()).collect(),
            });
        }

        println!("{}", TableRenderer::new().render_stack_list(&infos));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"domain_name = \"example.org\"\nasset_subdomain = \"static\"\n",
        )
        .unwrap();

        let args = StackArgs {
            config_file: Some(file.path().display().to_string()),
            domain: Some("Example.COM.".to_string()),
            properties: vec!["stack.asset-subdomain=cdn".to_string()],
            ..StackArgs::default()
        };
        let conf = args.resolve_config().unwrap();
        assert_eq!(conf.domain_name, "example.com");
        assert_eq!(conf.asset_subdomain, "cdn");
        assert_eq!(conf.asset_domain(), "cdn.example.com");
    }

    #[test]
    fn test_empty_zone_id_flag_unsets_pinned_zone() {
        let args = StackArgs {
            domain: Some("Example.com.".to_string()),
            zone_id: Some("".to_string()),
            ..StackArgs::default()
        };
        let conf = args.resolve_config().unwrap();
        assert_eq!(conf.domain_name, "example.com");
        assert_eq!(conf.zone.hosted_zone_id, None);
    }

    #[test]
    fn test_invalid_property_rejected() {
        let args = StackArgs {
            properties: vec!["no-equals-sign".to_string()],
            ..StackArgs::default()
        };
        assert!(args.resolve_config().is_err());
    }

    #[tokio::test]
    async fn test_pinned_zone_id_defines_stack() {
        let dir = tempfile::tempdir().unwrap();
        let args = StackArgs {
            domain: Some("example.com".to_string()),
            zone_id: Some("Z0PINNED".to_string()),
            context_file: Some(dir.path().join("absent.json").display().to_string()),
            ..StackArgs::default()
        };
        let (app, defined) = args.define().await.unwrap();
        assert_eq!(app.stacks().len(), 1);
        assert_eq!(defined.stack_name, "AssetStoreStack");
    }
}
