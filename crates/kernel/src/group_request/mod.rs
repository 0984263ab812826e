//! Membership request form shown to anonymous visitors of a group.
//!
//! Anonymous users cannot request membership directly; the form points them
//! to sign up or log in and brings them back to the page they came from
//! with the request pending.

use std::sync::Arc;

use url::Url;

use crate::form::{Form, FormElement};
use crate::routing::{RouteError, RouteRegistry, USER_LOGIN_ROUTE, USER_REGISTER_ROUTE};
use crate::services::locale::LocaleService;

pub const FORM_ID: &str = "social_group_request_membership_request_anonymous";

/// Query parameter telling the group page a request is pending.
pub const REQUESTED_MEMBERSHIP_PARAM: &str = "requested-membership";

pub struct AnonymousRequestForm {
    routes: Arc<RouteRegistry>,
    locale: Arc<LocaleService>,
}

impl AnonymousRequestForm {
    pub fn new(routes: Arc<RouteRegistry>, locale: Arc<LocaleService>) -> Self {
        Self { routes, locale }
    }

    pub fn form_id(&self) -> &'static str {
        FORM_ID
    }

    /// Build the form for a group.
    ///
    /// `referer` is the raw Referer header of the request showing the form.
    pub fn build_form(&self, group_id: i64, referer: Option<&str>) -> Result<Form, RouteError> {
        let destination = format!(
            "{}?{REQUESTED_MEMBERSHIP_PARAM}={group_id}",
            referer_request_uri(referer)
        );
        let params = [("destination", destination.as_str())];

        let sign_up = FormElement::link(
            self.locale.t("Sign up"),
            self.routes.url(USER_REGISTER_ROUTE, &params)?,
        )
        .classes("btn btn-primary waves-effect waves-btn");

        let log_in = FormElement::link(
            self.locale.t("Log in"),
            self.routes.url(USER_LOGIN_ROUTE, &params)?,
        )
        .classes("btn btn-default waves-effect waves-btn")
        .weight(1);

        Ok(Form::new(FORM_ID)
            .element(
                "description",
                FormElement::html_tag(
                    "p",
                    self.locale
                        .t("In order to send your request, please first sign up or log in."),
                ),
            )
            .element(
                "actions",
                FormElement::actions()
                    .weight(10)
                    .child("sign_up", sign_up)
                    .child("log_in", log_in),
            ))
    }

    /// Submitting the form does nothing; the links carry the flow.
    pub fn submit_form(&self, form: &Form) {
        tracing::trace!(form_id = %form.form_id, "anonymous membership request submitted");
    }
}

/// Path and query of the referring page, or `/` without a usable referer.
pub fn referer_request_uri(referer: Option<&str>) -> String {
    let Some(referer) = referer.map(str::trim).filter(|r| !r.is_empty()) else {
        return "/".to_string();
    };

    let parsed = Url::parse(referer).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(referer))
    });

    match parsed {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => "/".to_string(),
    }
}
