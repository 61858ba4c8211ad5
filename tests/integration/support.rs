use playground::api::ProjectApi;
use playground::server::RunningServer;
use playground::store::{MemoryProjectStore, SledProjectStore};
use std::sync::Arc;

pub async fn memory_server() -> RunningServer {
    let api = Arc::new(ProjectApi::new(Arc::new(MemoryProjectStore::new())));
    start(api).await
}

pub async fn sled_server(dir: &std::path::Path) -> RunningServer {
    let store = SledProjectStore::open(dir).unwrap();
    let api = Arc::new(ProjectApi::new(Arc::new(store)));
    start(api).await
}

async fn start(api: Arc<ProjectApi>) -> RunningServer {
    RunningServer::start("127.0.0.1:0".parse().unwrap(), api)
        .await
        .unwrap()
}

pub fn projects_url(server: &RunningServer) -> String {
    format!("{}/api/projects", server.base_url())
}
