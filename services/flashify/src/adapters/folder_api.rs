//! services/flashify/src/adapters/folder_api.rs
//!
//! The folder client. Folders are listed and created under the owning user's
//! id, and updated or deleted under their own id.

use async_trait::async_trait;
use flashify_core::{Folder, FolderChanges, FolderService, NewFolder, PortResult, Session};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{first_id, null_as_default, optional_id, HttpTransport};

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Serialize)]
struct FolderPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Mongo-style backends send `_id`, and sometimes a virtual `id` beside it.
#[derive(Deserialize)]
struct FolderRecord {
    #[serde(default, deserialize_with = "optional_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "optional_id")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
}

impl FolderRecord {
    fn to_domain(self) -> PortResult<Folder> {
        Ok(Folder {
            id: first_id([self.id, self.object_id], "folder")?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Deserialize)]
struct FolderListResponse {
    folders: Vec<FolderRecord>,
}

#[derive(Deserialize)]
struct FolderResponse {
    folder: FolderRecord,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct FolderApi {
    http: HttpTransport,
}

impl FolderApi {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }
}

#[async_trait]
impl FolderService for FolderApi {
    async fn list_folders(&self, user_id: &str, session: &Session) -> PortResult<Vec<Folder>> {
        let path = format!("/folder/{user_id}");
        let response = self
            .http
            .execute(self.http.authed(Method::GET, &path, session))
            .await?;
        let list: FolderListResponse = response.json()?;
        list.folders.into_iter().map(FolderRecord::to_domain).collect()
    }

    async fn create_folder(
        &self,
        user_id: &str,
        folder: &NewFolder,
        session: &Session,
    ) -> PortResult<Folder> {
        let path = format!("/folder/{user_id}");
        let payload = FolderPayload {
            name: Some(&folder.name),
            description: Some(&folder.description),
        };
        let response = self
            .http
            .execute(self.http.authed(Method::POST, &path, session).json(&payload))
            .await?;
        response.json::<FolderResponse>()?.folder.to_domain()
    }

    async fn update_folder(
        &self,
        folder_id: &str,
        changes: &FolderChanges,
        session: &Session,
    ) -> PortResult<Folder> {
        let path = format!("/folder/{folder_id}");
        let payload = FolderPayload {
            name: changes.name.as_deref(),
            description: changes.description.as_deref(),
        };
        let response = self
            .http
            .execute(self.http.authed(Method::PUT, &path, session).json(&payload))
            .await?;
        response.json::<FolderResponse>()?.folder.to_domain()
    }

    async fn delete_folder(&self, folder_id: &str, session: &Session) -> PortResult<()> {
        let path = format!("/folder/{folder_id}");
        self.http
            .execute(self.http.authed(Method::DELETE, &path, session))
            .await?;
        Ok(())
    }
}
