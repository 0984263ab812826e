//! Built-in export plugins.

use anyhow::Result;
use async_trait::async_trait;

use super::{ExportContext, UserExportPlugin};
use crate::models::{EntityType, User};

pub struct UserFirstName;

#[async_trait]
impl UserExportPlugin for UserFirstName {
    fn id(&self) -> &'static str {
        "user_first_name"
    }

    fn label(&self) -> &'static str {
        "First name"
    }

    fn weight(&self) -> i32 {
        -495
    }

    async fn value(&self, user: &User, _ctx: &ExportContext) -> Result<String> {
        Ok(user.first_name.clone().unwrap_or_default())
    }
}

pub struct UserLastName;

#[async_trait]
impl UserExportPlugin for UserLastName {
    fn id(&self) -> &'static str {
        "user_last_name"
    }

    fn label(&self) -> &'static str {
        "Last name"
    }

    fn weight(&self) -> i32 {
        -490
    }

    async fn value(&self, user: &User, _ctx: &ExportContext) -> Result<String> {
        Ok(user.last_name.clone().unwrap_or_default())
    }
}

pub struct UserEmail;

#[async_trait]
impl UserExportPlugin for UserEmail {
    fn id(&self) -> &'static str {
        "user_email"
    }

    fn label(&self) -> &'static str {
        "Email"
    }

    fn weight(&self) -> i32 {
        -485
    }

    async fn value(&self, user: &User, _ctx: &ExportContext) -> Result<String> {
        Ok(user.mail.clone())
    }
}

/// Number of event nodes the user authored.
pub struct UserEventsCreated;

#[async_trait]
impl UserExportPlugin for UserEventsCreated {
    fn id(&self) -> &'static str {
        "user_events_created"
    }

    fn label(&self) -> &'static str {
        "Events created"
    }

    fn weight(&self) -> i32 {
        -220
    }

    async fn value(&self, user: &User, ctx: &ExportContext) -> Result<String> {
        let count = ctx
            .store
            .count_authored(user.id, EntityType::Node, "event")
            .await?;
        Ok(count.to_string())
    }
}
