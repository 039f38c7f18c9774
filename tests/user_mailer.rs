use std::sync::Arc;

use testresult::TestResult;
use user_mailer::{
    domain::{
        auth::{
            emails::{MailerParameters, UserMailer, UserMailerError, UserMailerImpl},
            users::User,
        },
        communication::{
            email_addresses::{EmailAddress, NamedAddress},
            templates::TemplateError,
        },
    },
    infrastructure::{
        email::memory::InMemoryTransport,
        routing::{RouteTable, RoutesConfig},
        templates::MiniJinjaRenderer,
    },
};

const PARAMETERS: &str = r#"{
    "confirmation": { "template": "emails/registration/confirmation.jinja" },
    "resetting": { "template": "emails/resetting/reset.jinja" },
    "from_email": {
        "confirmation": "no-reply@example.com",
        "resetting": { "no-reply@example.com": "Support" }
    }
}"#;

fn mailer(
    parameters: MailerParameters,
    transport: InMemoryTransport,
) -> TestResult<UserMailerImpl<MiniJinjaRenderer, RouteTable, InMemoryTransport>> {
    let routes = RouteTable::from_config(&RoutesConfig {
        base_url: "https://example.com".to_string(),
        registration_confirm_path: "/register/confirm/{token}".to_string(),
        resetting_reset_path: "/resetting/reset/{token}".to_string(),
    })?;

    Ok(UserMailerImpl::new(
        Arc::new(MiniJinjaRenderer::new()?),
        Arc::new(routes),
        Arc::new(transport),
        parameters,
    ))
}

fn user() -> TestResult<User> {
    Ok(User::new("alice", EmailAddress::new("u@example.com")?).with_confirmation_token("tok123"))
}

#[tokio::test]
async fn confirmation_email_is_rendered_and_sent() -> TestResult {
    let transport = InMemoryTransport::new();
    let mailer = mailer(MailerParameters::from_json(PARAMETERS)?, transport.clone())?;

    mailer.send_confirmation_email_message(&user()?).await?;

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);

    let message = &messages[0];
    assert_eq!(message.subject(), "Welcome alice!");
    assert_eq!(
        message.senders(),
        [NamedAddress::new(EmailAddress::new("no-reply@example.com")?, "")]
    );
    assert_eq!(
        message.recipients(),
        [NamedAddress::new(EmailAddress::new("u@example.com")?, "")]
    );
    assert!(message
        .text_body()
        .contains("https://example.com/register/confirm/tok123"));
    assert!(message
        .html_body()
        .is_some_and(|html| html.contains("https://example.com/register/confirm/tok123")));

    Ok(())
}

#[tokio::test]
async fn resetting_email_has_no_html_body() -> TestResult {
    let transport = InMemoryTransport::new();
    let mailer = mailer(MailerParameters::from_json(PARAMETERS)?, transport.clone())?;

    mailer.send_resetting_email_message(&user()?).await?;

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);

    let message = &messages[0];
    assert_eq!(message.subject(), "Reset Password");
    assert_eq!(
        message.senders(),
        [NamedAddress::new(EmailAddress::new("no-reply@example.com")?, "Support")]
    );
    assert!(message
        .text_body()
        .contains("https://example.com/resetting/reset/tok123"));
    assert_eq!(message.html_body(), None);

    Ok(())
}

#[tokio::test]
async fn unknown_template_sends_nothing() -> TestResult {
    let parameters = MailerParameters::from_json(
        &PARAMETERS.replace("emails/registration/confirmation.jinja", "missing.jinja"),
    )?;
    let transport = InMemoryTransport::new();
    let mailer = mailer(parameters, transport.clone())?;

    let result = mailer.send_confirmation_email_message(&user()?).await;

    assert!(matches!(
        result,
        Err(UserMailerError::Template(TemplateError::TemplateNotFound(_)))
    ));
    assert!(transport.messages().is_empty());

    Ok(())
}

#[tokio::test]
async fn inlined_css_replaces_style_element() -> TestResult {
    let parameters = MailerParameters::from_json(PARAMETERS)?.with_inline_css(true);
    let transport = InMemoryTransport::new();
    let mailer = mailer(parameters, transport.clone())?;

    mailer.send_confirmation_email_message(&user()?).await?;

    let messages = transport.messages();
    let html = messages[0].html_body().unwrap_or_default();

    assert!(!html.contains("<style>"));
    assert!(html.contains("style=\""));

    Ok(())
}
