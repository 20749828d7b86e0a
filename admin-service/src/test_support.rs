use std::sync::{Arc, Mutex};

use axum::Router;
use tokio::net::TcpListener;

use crate::client::{BackendClient, Credentials};
use crate::interceptor::ErrorInterceptor;
use crate::notify::{Notification, Notifier};

/// Collects notifications so tests can assert on them.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn client_for(
    base_url: &str,
    access_token: Option<&str>,
    notifier: &RecordingNotifier,
) -> BackendClient {
    let interceptor = ErrorInterceptor::new(Arc::new(notifier.clone()));
    BackendClient::new(
        base_url,
        Credentials::new(access_token.map(str::to_string)),
        interceptor,
    )
}
