//! Built-in project used on first start and whenever a load fails.

use crate::types::{FileEntry, FileMap, ProjectConfig};

pub const DEFAULT_PROJECT_ID: &str = "my-first-playground";
pub const DEFAULT_USER_ID: &str = "local-user";

/// Entry file the active pointer falls back to.
pub const DEFAULT_ACTIVE_FILE: &str = "/App.js";

/// Core entry files that structural edits may not remove or move.
pub const PROTECTED_PATHS: &[&str] = &[
    "/App.js",
    "/styles.css",
    "/index.js",
    "/package.json",
    "/src/components/Title.js",
];

const APP_JS: &str = r#"import React from 'react';
import Title from './src/components/Title';
import './styles.css';

export default function App() {
  return (
    <div className="p-8 text-center h-screen">
      <Title text="Live!" />
      <p className="mt-4">Edit the files on the left to update this preview.</p>
    </div>
  );
}"#;

const STYLES_CSS: &str = r#".title {
  color: #4f46e5;
  font-size: 2.5rem;
  font-weight: 700;
  margin-bottom: 20px;
}"#;

const TITLE_JS: &str = r#"import React from 'react';

export default function Title({ text }) {
  return <h1 className="title">{text}</h1>;
}"#;

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PATHS.contains(&path)
}

pub fn default_files() -> FileMap {
    let mut files = FileMap::new();
    files.insert("/App.js".to_string(), FileEntry::new(APP_JS));
    files.insert("/styles.css".to_string(), FileEntry::new(STYLES_CSS));
    files.insert(
        "/src/components/Title.js".to_string(),
        FileEntry::new(TITLE_JS),
    );
    files
}

pub fn default_config() -> ProjectConfig {
    let mut options = serde_json::Map::new();
    options.insert("showConsole".to_string(), serde_json::Value::Bool(true));
    options.insert("showTabs".to_string(), serde_json::Value::Bool(false));
    options.insert("showLineNumbers".to_string(), serde_json::Value::Bool(true));
    ProjectConfig {
        dependencies_json: "{}".to_string(),
        options,
    }
}
