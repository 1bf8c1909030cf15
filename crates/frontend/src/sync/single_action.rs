//! Operations on a single record whose endpoint is written on the trigger
//! itself (`data-action`), outside of any editable list.

use super::form_serializer::serialize_form;
use super::SyncContext;
use crate::shared::api_utils::keyed_url;
use crate::shared::dom::Dom;
use crate::shared::notice::ErrorReporter;
use crate::shared::transport::Transport;
use contracts::shared::error::SyncError;
use contracts::shared::http::HttpRequest;

pub struct SingleActionSync<'a, D, T, R> {
    ctx: &'a SyncContext<D, T, R>,
}

impl<'a, D, T, R> SingleActionSync<'a, D, T, R>
where
    D: Dom,
    T: Transport,
    R: ErrorReporter,
{
    pub fn new(ctx: &'a SyncContext<D, T, R>) -> Self {
        Self { ctx }
    }

    fn action_of(&self, node: &D::Node) -> Option<String> {
        self.ctx
            .dom
            .non_empty_attribute(node, &self.ctx.config.action_attr)
    }

    /// `POST {data-action}`; the returned fragment goes into the trigger's
    /// parent and its last child is scrolled into view.
    pub async fn add(&self, trigger: &D::Node) -> Result<Vec<D::Node>, SyncError> {
        let result = self.try_add(trigger).await;
        self.ctx.surface("single add", result)
    }

    async fn try_add(&self, trigger: &D::Node) -> Result<Vec<D::Node>, SyncError> {
        let dom = &self.ctx.dom;
        let action = self
            .action_of(trigger)
            .ok_or_else(|| SyncError::missing(format!("trigger has no {}", self.ctx.config.action_attr)))?;
        let parent = dom
            .parent(trigger)
            .ok_or_else(|| SyncError::missing("trigger has no parent"))?;

        let response = self.ctx.dispatch(HttpRequest::post(action.clone())).await?;

        let inserted = dom.append_html(&parent, &response.body);
        log::info!("added {} element(s) via {}", inserted.len(), action);
        if let Some(last) = dom.last_child(&parent) {
            self.ctx.scroll_reveal().reveal(&last);
        }
        Ok(inserted)
    }

    /// `PUT` of the enclosing form to the trigger's action, falling back to
    /// the form's `data-action`, then its `action`.
    pub async fn update(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let result = self.try_update(trigger).await;
        self.ctx.surface("single update", result)
    }

    async fn try_update(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let dom = &self.ctx.dom;
        let form = dom
            .closest_tag(trigger, "form")
            .ok_or_else(|| SyncError::missing("trigger is not inside a form"))?;
        let action = self
            .action_of(trigger)
            .or_else(|| self.action_of(&form))
            .or_else(|| dom.non_empty_attribute(&form, "action"))
            .ok_or_else(|| SyncError::missing("form has no action"))?;

        let payload = serialize_form(dom, &form);
        let generation = self.ctx.tracker.generation(dom, &form);
        self.ctx
            .dispatch(HttpRequest::put_json(action.clone(), &payload))
            .await?;
        self.ctx.tracker.mark_saved(dom, &form, generation);
        log::info!("saved {} field(s) to {}", payload.len(), action);
        Ok(())
    }

    /// Marks the trigger's card on the server and tags it with the added
    /// class. Failures are logged, never reported.
    pub async fn mark(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let result = self.try_mark(trigger).await;
        if let Err(error) = &result {
            log::warn!("mark failed: {}", error);
        }
        result
    }

    async fn try_mark(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let dom = &self.ctx.dom;
        let config = &self.ctx.config;
        let card = dom
            .parent(trigger)
            .ok_or_else(|| SyncError::missing("trigger has no card"))?;
        let action = self
            .action_of(trigger)
            .or_else(|| self.action_of(&card))
            .ok_or_else(|| SyncError::missing(format!("card has no {}", config.action_attr)))?;

        let key = dom.non_empty_attribute(trigger, &config.key_param_attr).zip(
            dom.non_empty_attribute(&card, &config.key_attr),
        );
        let url = match key {
            Some((param, value)) => keyed_url(&action, &param, &value),
            None => action,
        };

        self.ctx.dispatch(HttpRequest::post(url.clone())).await?;
        dom.add_class(&card, &config.added_class);
        log::info!("marked card via {}", url);
        Ok(())
    }
}
