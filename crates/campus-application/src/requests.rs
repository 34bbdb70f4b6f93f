//! Generic service request board.

use crate::busy::BusyFlag;
use campus_core::api::PortalApi;
use campus_core::request::{NewServiceRequest, RequestQuery, RequestStatus, ServiceRequest};
use campus_core::{PortalError, Result};
use std::sync::Arc;

const MIN_TITLE_CHARS: usize = 5;

pub struct RequestBoard {
    api: Arc<dyn PortalApi>,
    query: RequestQuery,
    requests: Vec<ServiceRequest>,
    total: u64,
    status_view: Option<RequestStatus>,
    loading: BusyFlag,
    submitting: BusyFlag,
    error: Option<String>,
}

impl RequestBoard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            query: RequestQuery::default(),
            requests: Vec::new(),
            total: 0,
            status_view: None,
            loading: BusyFlag::default(),
            submitting: BusyFlag::default(),
            error: None,
        }
    }

    pub fn requests(&self) -> &[ServiceRequest] {
        &self.requests
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn query(&self) -> &RequestQuery {
        &self.query
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Restricts [`visible`](Self::visible) to one display status.
    pub fn set_status_view(&mut self, status: Option<RequestStatus>) {
        self.status_view = status;
    }

    pub fn visible(&self) -> Vec<&ServiceRequest> {
        self.requests
            .iter()
            .filter(|request| self.status_view.is_none_or(|status| request.status == status))
            .collect()
    }

    pub async fn load(&mut self, query: RequestQuery) -> Result<()> {
        let result = {
            let _busy = self.loading.enter()?;
            self.api.list_requests(&query).await
        };

        match result {
            Ok(page) => {
                tracing::debug!("[Requests] Page {} of {} request(s)", page.page, page.total);
                self.total = page.total;
                self.requests = page.requests;
                self.query = query;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Validates and submits a new request, then reloads the current page.
    pub async fn submit(&mut self, request: NewServiceRequest) -> Result<ServiceRequest> {
        if request.title.trim().chars().count() < MIN_TITLE_CHARS {
            let err = PortalError::validation(
                "title",
                format!("Title must be at least {MIN_TITLE_CHARS} characters"),
            );
            self.error = Some(err.user_message());
            return Err(err);
        }
        if request.request_type.trim().is_empty() {
            let err = PortalError::validation("request_type", "Request type is required");
            self.error = Some(err.user_message());
            return Err(err);
        }
        let request = NewServiceRequest {
            title: request.title.trim().to_string(),
            ..request
        };

        let result = {
            let _busy = self.submitting.enter()?;
            self.api.submit_request(&request).await
        };

        let created = match result {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!("[Requests] Submit failed: {}", e);
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        tracing::info!("[Requests] Created {} ({})", created.id, created.request_type);
        if let Err(e) = self.load(self.query.clone()).await {
            tracing::debug!("[Requests] Reload after submit failed: {}", e);
        }
        Ok(created)
    }
}
