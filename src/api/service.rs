//! Session store behind the REST handlers
//!
//! Each upload becomes a session with its own lead set and filter state.
//! Every read recomputes the dashboard from the session's current selection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DetailView};
use crate::error::Result;
use crate::loader::load_leads_from_str;
use crate::session::{Session, SessionSummary};

pub type SessionId = u64;

pub struct DashboardService {
    config: DashboardConfig,
    sessions: RwLock<HashMap<SessionId, Session>>,
    next_id: AtomicU64,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Parse an uploaded CSV into a new session. Nothing is stored when the
    /// upload is malformed.
    pub async fn create_session(&self, csv: &str) -> Result<(SessionId, SessionSummary)> {
        let leads = load_leads_from_str(csv)?;
        let session = Session::new(leads);
        let summary = session.summary();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sessions.write().await.insert(id, session);
        info!("Created session {} with {} leads", id, summary.total_leads);
        Ok((id, summary))
    }

    pub async fn summary(&self, id: SessionId) -> Option<SessionSummary> {
        self.sessions.read().await.get(&id).map(Session::summary)
    }

    pub async fn remove_session(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Closed session {}", id);
        }
        removed
    }

    pub async fn set_selection(&self, id: SessionId, sources: Vec<String>) -> Option<SessionSummary> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.set_selection(sources);
        Some(session.summary())
    }

    pub async fn select_all(&self, id: SessionId) -> Option<SessionSummary> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.select_all();
        Some(session.summary())
    }

    pub async fn set_detail_view(&self, id: SessionId, view: DetailView) -> Option<SessionSummary> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.set_detail_view(view);
        Some(session.summary())
    }

    pub async fn dashboard(&self, id: SessionId) -> Option<Dashboard> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(|s| s.dashboard(&self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Lead Source,Lead Stage,Group,Owner,Lead Type
Web,New Lead,North,Alice,Buyer
Ads,Lost,South,Bob,Renter
";

    #[tokio::test]
    async fn test_session_lifecycle() {
        let service = DashboardService::new(DashboardConfig::default());
        let (id, summary) = service.create_session(CSV).await.unwrap();
        assert_eq!(summary.total_leads, 2);

        let summary = service.set_selection(id, vec!["Web".to_string()]).await.unwrap();
        assert_eq!(summary.selected_sources, vec!["Web"]);
        assert_eq!(service.dashboard(id).await.unwrap().filtered_leads, 1);

        service.select_all(id).await.unwrap();
        assert_eq!(service.dashboard(id).await.unwrap().filtered_leads, 2);

        assert!(service.remove_session(id).await);
        assert!(service.dashboard(id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let service = DashboardService::new(DashboardConfig::default());
        let (a, _) = service.create_session(CSV).await.unwrap();
        let (b, _) = service.create_session(CSV).await.unwrap();
        assert_ne!(a, b);

        service.set_selection(a, vec![]).await.unwrap();
        assert_eq!(service.dashboard(a).await.unwrap().filtered_leads, 0);
        assert_eq!(service.dashboard(b).await.unwrap().filtered_leads, 2);
    }

    #[tokio::test]
    async fn test_malformed_upload_creates_nothing() {
        let service = DashboardService::new(DashboardConfig::default());
        assert!(service.create_session("a,b\n1,2,3\n").await.is_err());
        assert!(service.summary(1).await.is_none());
    }
}
