//! MiniJinja template renderer

use std::{path::PathBuf, sync::Arc};

use anyhow::anyhow;
use clap::Parser;
use minijinja::{path_loader, Environment, ErrorKind, UndefinedBehavior};
use tracing::debug;

use crate::domain::communication::templates::{RenderContext, TemplateError, TemplateRenderer};

/// Bundled template for registration confirmation emails
pub const DEFAULT_CONFIRMATION_TEMPLATE: &str = "emails/registration/confirmation.jinja";

/// Bundled template for password resetting emails
pub const DEFAULT_RESETTING_TEMPLATE: &str = "emails/resetting/reset.jinja";

/// Template configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct TemplatesConfig {
    /// Directory to load email templates from instead of the bundled ones
    #[clap(long, env = "MAILER_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,
}

/// Renders template blocks with MiniJinja
#[derive(Debug, Clone)]
pub struct MiniJinjaRenderer {
    env: Arc<Environment<'static>>,
}

impl MiniJinjaRenderer {
    /// Create a renderer with the bundled templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Self::environment();

        env.add_template(
            DEFAULT_CONFIRMATION_TEMPLATE,
            include_str!("../../../templates/emails/registration/confirmation.jinja"),
        )
        .map_err(|e| TemplateError::RenderError(e.into()))?;

        env.add_template(
            DEFAULT_RESETTING_TEMPLATE,
            include_str!("../../../templates/emails/resetting/reset.jinja"),
        )
        .map_err(|e| TemplateError::RenderError(e.into()))?;

        Ok(Self::from_environment(env))
    }

    /// Create a renderer loading templates by path from a directory
    pub fn from_directory(dir: impl Into<PathBuf>) -> Self {
        let mut env = Self::environment();

        env.set_loader(path_loader(dir.into()));

        Self::from_environment(env)
    }

    /// Create a renderer from the given configuration
    pub fn from_config(config: &TemplatesConfig) -> Result<Self, TemplateError> {
        match &config.templates_dir {
            Some(dir) => Ok(Self::from_directory(dir.clone())),
            None => Self::new(),
        }
    }

    /// Wrap an existing environment
    pub fn from_environment(env: Environment<'static>) -> Self {
        Self { env: Arc::new(env) }
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();

        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env
    }

    fn render(
        &self,
        template: &str,
        block: &str,
        context: &RenderContext,
    ) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(template)?;
        let (_, mut state) = template.render_and_return_state(context)?;

        state.render_block(block)
    }

    fn convert_error(template: &str, block: &str, err: minijinja::Error) -> TemplateError {
        debug!("minijinja::Error -> TemplateError: {:?}", err);

        match err.kind() {
            ErrorKind::TemplateNotFound => TemplateError::TemplateNotFound(template.to_string()),
            ErrorKind::UnknownBlock => TemplateError::BlockNotFound {
                template: template.to_string(),
                block: block.to_string(),
            },
            _ => TemplateError::RenderError(anyhow!(err)),
        }
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render_block(
        &self,
        template: &str,
        block: &str,
        context: &RenderContext,
    ) -> Result<String, TemplateError> {
        self.render(template, block, context)
            .map_err(|err| Self::convert_error(template, block, err))
    }

    fn has_block(
        &self,
        template: &str,
        block: &str,
        context: &RenderContext,
    ) -> Result<bool, TemplateError> {
        match self.render(template, block, context) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::UnknownBlock => Ok(false),
            Err(err) => Err(Self::convert_error(template, block, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        auth::users::User,
        communication::{
            email_addresses::EmailAddress,
            templates::{BODY_HTML_BLOCK, BODY_TEXT_BLOCK, SUBJECT_BLOCK},
        },
    };

    use super::*;

    fn context() -> RenderContext {
        RenderContext {
            user: User::new("alice", EmailAddress::new("alice@example.com").unwrap())
                .with_confirmation_token("tok123"),
            confirmation_url: "https://example.com/register/confirm/tok123".to_string(),
        }
    }

    #[test]
    fn test_bundled_confirmation_template_renders_every_block() -> TestResult {
        let renderer = MiniJinjaRenderer::new()?;
        let context = context();

        let subject =
            renderer.render_block(DEFAULT_CONFIRMATION_TEMPLATE, SUBJECT_BLOCK, &context)?;
        let text = renderer.render_block(DEFAULT_CONFIRMATION_TEMPLATE, BODY_TEXT_BLOCK, &context)?;
        let html = renderer.render_block(DEFAULT_CONFIRMATION_TEMPLATE, BODY_HTML_BLOCK, &context)?;

        assert_eq!(subject, "Welcome alice!");
        assert!(text.starts_with("Hello alice!"));
        assert!(text.contains("https://example.com/register/confirm/tok123"));
        assert!(html.contains("href=\"https://example.com/register/confirm/tok123\""));

        Ok(())
    }

    #[test]
    fn test_has_block_reports_optional_html_block() -> TestResult {
        let renderer = MiniJinjaRenderer::new()?;
        let context = context();

        assert!(renderer.has_block(DEFAULT_CONFIRMATION_TEMPLATE, BODY_HTML_BLOCK, &context)?);
        assert!(!renderer.has_block(DEFAULT_RESETTING_TEMPLATE, BODY_HTML_BLOCK, &context)?);

        Ok(())
    }

    #[test]
    fn test_unknown_template_is_not_found() -> TestResult {
        let renderer = MiniJinjaRenderer::new()?;

        let result = renderer.render_block("missing.jinja", SUBJECT_BLOCK, &context());

        assert!(matches!(
            result,
            Err(TemplateError::TemplateNotFound(ref name)) if name == "missing.jinja"
        ));

        let result = renderer.has_block("missing.jinja", BODY_HTML_BLOCK, &context());

        assert!(matches!(result, Err(TemplateError::TemplateNotFound(_))));

        Ok(())
    }

    #[test]
    fn test_unknown_block_is_not_found() -> TestResult {
        let renderer = MiniJinjaRenderer::new()?;

        let result = renderer.render_block(DEFAULT_RESETTING_TEMPLATE, BODY_HTML_BLOCK, &context());

        assert!(matches!(
            result,
            Err(TemplateError::BlockNotFound { ref block, .. }) if block == BODY_HTML_BLOCK
        ));

        Ok(())
    }

    #[test]
    fn test_undefined_variable_is_a_render_error() -> TestResult {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("broken.jinja", "{% block subject %}{{ nope.nope }}{% endblock %}")?;

        let renderer = MiniJinjaRenderer::from_environment(env);

        let result = renderer.render_block("broken.jinja", SUBJECT_BLOCK, &context());

        assert!(matches!(result, Err(TemplateError::RenderError(_))));

        Ok(())
    }

    #[test]
    fn test_templates_are_loaded_from_directory() -> TestResult {
        let renderer = MiniJinjaRenderer::from_directory(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates"
        ));

        let subject =
            renderer.render_block(DEFAULT_RESETTING_TEMPLATE, SUBJECT_BLOCK, &context())?;

        assert_eq!(subject, "Reset Password");

        Ok(())
    }
}
