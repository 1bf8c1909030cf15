//! Add, delete and update records of an editable list.
//!
//! Markup shape:
//!
//! ```html
//! <head data-parent-id="42">
//! ...
//! <div class="editable-list" data-base-action="/timings">
//!   <div class="editable-list-item" data-id="7">
//!     <form>...</form>
//!   </div>
//! </div>
//! ```
//!
//! Trigger-based operations resolve a `ListBinding` from the nearest enclosing
//! list container and delegate to the explicit-binding variants.

use super::form_serializer::serialize_form;
use super::SyncContext;
use crate::shared::api_utils::{add_item_url, item_url};
use crate::shared::dom::Dom;
use crate::shared::notice::ErrorReporter;
use crate::shared::transport::Transport;
use contracts::shared::error::SyncError;
use contracts::shared::http::HttpRequest;

/// One list container and the endpoint it syncs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ListBinding<N> {
    pub container: N,
    pub base_action: String,
    /// Page-level parent id, used when the trigger is not inside an item.
    pub default_parent_id: Option<String>,
}

/// A persisted item and its server id.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTarget<N> {
    pub item: N,
    pub id: String,
}

pub struct CollectionSync<'a, D, T, R> {
    ctx: &'a SyncContext<D, T, R>,
}

impl<'a, D, T, R> CollectionSync<'a, D, T, R>
where
    D: Dom,
    T: Transport,
    R: ErrorReporter,
{
    pub fn new(ctx: &'a SyncContext<D, T, R>) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Nearest enclosing list container of `trigger`.
    pub fn resolve_list(&self, trigger: &D::Node) -> Result<ListBinding<D::Node>, SyncError> {
        let dom = &self.ctx.dom;
        let config = &self.ctx.config;
        let container = dom
            .closest_with_class(trigger, &config.list_class)
            .ok_or_else(|| SyncError::missing(format!("trigger is not inside .{}", config.list_class)))?;
        let base_action = dom
            .non_empty_attribute(&container, &config.base_action_attr)
            .ok_or_else(|| SyncError::missing(format!("list has no {}", config.base_action_attr)))?;
        Ok(ListBinding {
            container,
            base_action,
            default_parent_id: dom
                .page_attribute(&config.page_parent_attr)
                .filter(|id| !id.trim().is_empty()),
        })
    }

    /// Nearest enclosing item of `trigger`, with its id.
    pub fn resolve_item(&self, trigger: &D::Node) -> Result<ItemTarget<D::Node>, SyncError> {
        let dom = &self.ctx.dom;
        let config = &self.ctx.config;
        let item = dom
            .closest_with_class(trigger, &config.item_class)
            .ok_or_else(|| SyncError::missing(format!("trigger is not inside .{}", config.item_class)))?;
        let id = dom
            .non_empty_attribute(&item, &config.id_attr)
            .ok_or_else(|| SyncError::missing(format!("item has no {}", config.id_attr)))?;
        Ok(ItemTarget { item, id })
    }

    /// Enclosing item's id, else the page default.
    pub fn resolve_parent_id(
        &self,
        trigger: &D::Node,
        list: &ListBinding<D::Node>,
    ) -> Result<String, SyncError> {
        self.resolve_item(trigger)
            .ok()
            .map(|target| target.id)
            .or_else(|| list.default_parent_id.clone())
            .ok_or_else(|| SyncError::missing("no parent id on the enclosing item or the page"))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Creates a record under the trigger's parent and appends the returned
    /// fragment to the list. Returns the inserted elements.
    pub async fn add(&self, trigger: &D::Node) -> Result<Vec<D::Node>, SyncError> {
        let resolved = self
            .resolve_list(trigger)
            .and_then(|list| Ok((self.resolve_parent_id(trigger, &list)?, list)));
        let result = match resolved {
            Ok((parent_id, list)) => self.try_add_to(&list, &parent_id).await,
            Err(error) => Err(error),
        };
        self.ctx.surface("add", result)
    }

    pub async fn add_to(
        &self,
        list: &ListBinding<D::Node>,
        parent_id: &str,
    ) -> Result<Vec<D::Node>, SyncError> {
        let result = self.try_add_to(list, parent_id).await;
        self.ctx.surface("add", result)
    }

    async fn try_add_to(
        &self,
        list: &ListBinding<D::Node>,
        parent_id: &str,
    ) -> Result<Vec<D::Node>, SyncError> {
        let url = add_item_url(&list.base_action, parent_id);
        let response = self.ctx.dispatch(HttpRequest::post(url)).await?;

        let dom = &self.ctx.dom;
        let inserted = dom.append_html(&list.container, &response.body);
        log::info!(
            "added {} element(s) to {} (parent {})",
            inserted.len(),
            list.base_action,
            parent_id
        );
        if let Some(first) = inserted.first() {
            self.ctx.scroll_reveal().reveal(first);
        }
        Ok(inserted)
    }

    /// Deletes the trigger's item on the server, then removes it locally.
    pub async fn delete(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let resolved = self
            .resolve_list(trigger)
            .and_then(|list| Ok((list, self.resolve_item(trigger)?)));
        let result = match resolved {
            Ok((list, target)) => self.try_delete_item(&list, &target).await,
            Err(error) => Err(error),
        };
        self.ctx.surface("delete", result)
    }

    pub async fn delete_item(
        &self,
        list: &ListBinding<D::Node>,
        target: &ItemTarget<D::Node>,
    ) -> Result<(), SyncError> {
        let result = self.try_delete_item(list, target).await;
        self.ctx.surface("delete", result)
    }

    async fn try_delete_item(
        &self,
        list: &ListBinding<D::Node>,
        target: &ItemTarget<D::Node>,
    ) -> Result<(), SyncError> {
        let url = item_url(&list.base_action, &target.id);
        self.ctx.dispatch(HttpRequest::delete(url)).await?;
        self.ctx.dom.remove(&target.item);
        log::info!("deleted item {} from {}", target.id, list.base_action);
        Ok(())
    }

    /// Saves the trigger's form with `PUT {base_action}` and clears its
    /// unsaved mark once the server accepts it, unless the form was edited
    /// again while the request was in flight.
    pub async fn update(&self, trigger: &D::Node) -> Result<(), SyncError> {
        let resolved = self.resolve_list(trigger).and_then(|list| {
            let form = self
                .ctx
                .dom
                .closest_tag(trigger, "form")
                .ok_or_else(|| SyncError::missing("trigger is not inside a form"))?;
            Ok((list, form))
        });
        let result = match resolved {
            Ok((list, form)) => self.try_update_form(&list, &form).await,
            Err(error) => Err(error),
        };
        self.ctx.surface("update", result)
    }

    pub async fn update_form(
        &self,
        list: &ListBinding<D::Node>,
        form: &D::Node,
    ) -> Result<(), SyncError> {
        let result = self.try_update_form(list, form).await;
        self.ctx.surface("update", result)
    }

    async fn try_update_form(
        &self,
        list: &ListBinding<D::Node>,
        form: &D::Node,
    ) -> Result<(), SyncError> {
        let payload = serialize_form(&self.ctx.dom, form);
        let generation = self.ctx.tracker.generation(&self.ctx.dom, form);
        let request = HttpRequest::put_json(list.base_action.clone(), &payload);
        self.ctx.dispatch(request).await?;
        self.ctx.tracker.mark_saved(&self.ctx.dom, form, generation);
        log::info!("saved {} field(s) to {}", payload.len(), list.base_action);
        Ok(())
    }
}
