//! Box API client: configuration, request dispatch, and the typed
//! convenience surface over the command table.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use crate::commands::{self, ExtraParams, Host, Operation, Placement};
use crate::error::{BoxError, Result};
use crate::response::{transform, Payload};

/// Base URL for the general Box API.
const API_BASE: &str = "https://api.box.com/2.0";

/// Base URL for the Box upload API.
const UPLOAD_BASE: &str = "https://upload.box.com/api/2.0";

/// Parameter bag supplied per operation invocation.
pub type Params = serde_json::Map<String, Value>;

/// Optional query parameters for [`BoxClient::search_folder`].
#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    /// Limits results to items of this type (`file`, `folder`, `web_link`).
    pub item_type: Option<String>,
    /// Comma-separated list of attributes to include in the response.
    pub fields: Option<String>,
    /// Comma-separated list of file extensions to match.
    pub file_extensions: Option<String>,
    /// Metadata template filters.
    pub mdfilters: Option<Value>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Binary part attached to a multipart operation, satisfying the declared
/// parameter it is named after.
struct FilePart {
    param: &'static str,
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

/// Client for the Box file-storage REST API.
///
/// Holds only immutable configuration (bearer token, base URLs, HTTP
/// client); it is cheap to clone and safe to share across tasks. Every
/// outgoing request carries `Authorization: Bearer <token>` and
/// `Accept: application/json`, and redirects are never followed — some
/// endpoints signal state through 3xx responses that the client must not
/// mask.
#[derive(Clone)]
pub struct BoxClient {
    token: String,
    api_base: String,
    upload_base: String,
    http: Client,
}

/// Builder for [`BoxClient`].
#[derive(Debug, Clone)]
pub struct BoxClientBuilder {
    token: String,
    api_base: String,
    upload_base: String,
    timeout: Option<Duration>,
}

impl BoxClientBuilder {
    /// Override the general API base URL.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Override the upload base URL.
    pub fn upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = base.into();
        self
    }

    /// Set the request timeout. The transport default applies when unset.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BoxClient> {
        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(BoxClient {
            token: self.token,
            api_base: self.api_base,
            upload_base: self.upload_base,
            http: builder.build()?,
        })
    }
}

impl BoxClient {
    /// Create a new client with the default Box base URLs.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Start building a client, overriding base URLs or the timeout.
    pub fn builder(token: impl Into<String>) -> BoxClientBuilder {
        BoxClientBuilder {
            token: token.into(),
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
            timeout: None,
        }
    }

    /// Invoke a named operation with a parameter bag.
    ///
    /// Fails with [`BoxError::UnknownOperation`] or
    /// [`BoxError::MissingParameter`] before any network call is made.
    pub async fn execute(&self, operation: &str, params: Params) -> Result<Payload> {
        self.dispatch(operation, params, None).await
    }

    async fn dispatch(
        &self,
        operation: &str,
        params: Params,
        file: Option<FilePart>,
    ) -> Result<Payload> {
        let op = commands::lookup(operation)
            .ok_or_else(|| BoxError::UnknownOperation(operation.to_string()))?;
        let request = self.build_request(op, &params, file)?;
        let response = request.send().await?;
        transform(response).await
    }

    /// Serialize an operation and its parameters into an outbound request.
    fn build_request(
        &self,
        op: &Operation,
        params: &Params,
        file: Option<FilePart>,
    ) -> Result<RequestBuilder> {
        for spec in op.params {
            if spec.required
                && !has(params, spec.name)
                && !file.as_ref().is_some_and(|f| f.param == spec.name)
            {
                return Err(BoxError::MissingParameter(spec.name.to_string()));
            }
        }

        let mut path = op.path.to_string();
        let mut query: Vec<(String, String)> = Vec::new();
        let mut body = Params::new();
        let mut raw_body: Option<Value> = None;
        let mut headers: Vec<(&'static str, String)> = Vec::new();
        let mut form_fields: Vec<(&'static str, String)> = Vec::new();

        for spec in op.params {
            let Some(value) = params.get(spec.name) else {
                continue;
            };
            // Null means "omit".
            if value.is_null() {
                continue;
            }
            match spec.placement {
                Placement::Path => {
                    let segment = path_segment(spec.name, value)?;
                    path = path.replace(&format!("{{{}}}", spec.name), &segment);
                }
                Placement::Query => query.push((spec.name.to_string(), flatten(value))),
                Placement::Body => {
                    body.insert(spec.name.to_string(), body_value(value));
                }
                Placement::RawBody => raw_body = Some(value.clone()),
                Placement::Header => headers.push((spec.name, flatten(value))),
                Placement::Multipart => form_fields.push((spec.name, flatten(value))),
            }
        }

        if op.extra == ExtraParams::Body {
            for (name, value) in params {
                let declared = op.params.iter().any(|s| s.name == name.as_str());
                if !declared && !value.is_null() {
                    body.insert(name.clone(), body_value(value));
                }
            }
        }

        let base = match op.host {
            Host::Api => &self.api_base,
            Host::Upload => &self.upload_base,
        };
        let url = format!("{}{}", base, path);
        debug!("{} {}", op.method, url);

        let mut request = self
            .http
            .request(op.method.clone(), url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(&query);
        }
        for (name, value) in headers {
            request = request.header(name, value);
        }

        if let Some(value) = raw_body {
            let content_type = op.content_type.unwrap_or("application/json");
            request = request
                .header(CONTENT_TYPE, content_type)
                .body(serde_json::to_vec(&value)?);
        } else if !body.is_empty() {
            request = request.json(&Value::Object(body));
        }

        if !form_fields.is_empty() || file.is_some() {
            let mut form = Form::new();
            for (name, value) in form_fields {
                form = form.text(name, value);
            }
            if let Some(f) = file {
                let part = Part::bytes(f.bytes)
                    .file_name(f.file_name)
                    .mime_str(&f.mime)?;
                form = form.part(f.param, part);
            }
            request = request.multipart(form);
        }

        Ok(request)
    }

    /// Search for items under the given ancestor folders.
    pub async fn search_folder(
        &self,
        ancestor_folder_ids: &str,
        options: SearchOptions,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.insert(
            "ancestor_folder_ids".to_string(),
            Value::String(ancestor_folder_ids.to_string()),
        );
        insert_str(&mut params, "type", options.item_type.as_deref());
        insert_str(&mut params, "fields", options.fields.as_deref());
        insert_str(
            &mut params,
            "file_extensions",
            options.file_extensions.as_deref(),
        );
        if let Some(mdfilters) = options.mdfilters {
            params.insert("mdfilters".to_string(), mdfilters);
        }
        params.insert("limit".to_string(), options.limit.unwrap_or(100).into());
        params.insert("offset".to_string(), options.offset.unwrap_or(0).into());
        Ok(self.execute("SearchFolder", params).await?.into_json())
    }

    /// Get information about a folder's items.
    ///
    /// # Arguments
    /// * `id` - The folder ID
    /// * `fields` - Comma-separated list of attributes to include
    pub async fn get_folder_items(
        &self,
        id: &str,
        fields: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let mut params = id_params(id);
        insert_str(&mut params, "fields", fields);
        params.insert("limit".to_string(), limit.unwrap_or(100).into());
        params.insert("offset".to_string(), offset.unwrap_or(0).into());
        Ok(self.execute("GetFolderItems", params).await?.into_json())
    }

    /// Create a new folder under the given parent.
    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<Value> {
        let mut params = Params::new();
        params.insert("name".to_string(), Value::String(name.to_string()));
        params.insert("parent".to_string(), json!({ "id": parent_id }));
        Ok(self.execute("CreateFolder", params).await?.into_json())
    }

    /// Get information about a folder.
    pub async fn get_folder(&self, id: &str) -> Result<Value> {
        Ok(self.execute("GetFolder", id_params(id)).await?.into_json())
    }

    /// Copy a folder into a destination parent, optionally renaming it.
    pub async fn copy_folder(
        &self,
        id: &str,
        parent_id: &str,
        name: Option<&str>,
    ) -> Result<Value> {
        let mut params = id_params(id);
        params.insert("parent".to_string(), json!({ "id": parent_id }));
        insert_str(&mut params, "name", name);
        Ok(self.execute("CopyFolder", params).await?.into_json())
    }

    /// Delete a folder.
    ///
    /// # Arguments
    /// * `recursive` - Whether to delete the folder's contents as well
    /// * `etag` - Optional etag sent in the `if-match` header
    pub async fn delete_folder(&self, id: &str, recursive: bool, etag: Option<&str>) -> Result<()> {
        let mut params = id_params(id);
        if recursive {
            params.insert("recursive".to_string(), Value::Bool(true));
        }
        insert_str(&mut params, "if-match", etag);
        self.execute("DeleteFolder", params).await?;
        Ok(())
    }

    /// Update a folder's attributes.
    ///
    /// `fields` is passed through to the JSON body as-is, so any attribute
    /// the API accepts (name, description, tags, ...) can be set.
    pub async fn update_folder(&self, id: &str, fields: Params, etag: Option<&str>) -> Result<Value> {
        let mut params = fields;
        params.insert("id".to_string(), Value::String(id.to_string()));
        insert_str(&mut params, "if-match", etag);
        Ok(self.execute("UpdateFolder", params).await?.into_json())
    }

    /// Get a folder's discussions.
    pub async fn get_folder_discussions(&self, id: &str) -> Result<Value> {
        Ok(self
            .execute("GetFolderDiscussions", id_params(id))
            .await?
            .into_json())
    }

    /// Get a folder's collaborations.
    pub async fn get_folder_collaborations(&self, id: &str) -> Result<Value> {
        Ok(self
            .execute("GetFolderCollaborations", id_params(id))
            .await?
            .into_json())
    }

    /// List the items in the trash.
    pub async fn get_trash_items(
        &self,
        fields: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let mut params = Params::new();
        insert_str(&mut params, "fields", fields);
        params.insert("limit".to_string(), limit.unwrap_or(100).into());
        params.insert("offset".to_string(), offset.unwrap_or(0).into());
        Ok(self.execute("GetTrashItems", params).await?.into_json())
    }

    /// Permanently delete a folder that is in the trash.
    pub async fn delete_trashed_folder(&self, id: &str) -> Result<()> {
        self.execute("DeleteTrashedFolder", id_params(id)).await?;
        Ok(())
    }

    /// Get a file's metadata.
    pub async fn get_file(&self, id: &str, fields: Option<&str>) -> Result<Value> {
        let mut params = id_params(id);
        insert_str(&mut params, "fields", fields);
        Ok(self.execute("GetFile", params).await?.into_json())
    }

    /// Download a file's content, optionally at a specific version.
    pub async fn download_file(&self, id: &str, version: Option<&str>) -> Result<Bytes> {
        let mut params = id_params(id);
        insert_str(&mut params, "version", version);
        Ok(self.execute("DownloadFile", params).await?.into_bytes())
    }

    /// Upload a local file into a folder.
    ///
    /// # Arguments
    /// * `name` - The name the file gets on the server
    /// * `parent_id` - The ID of the destination folder
    /// * `local_path` - Path to the local file
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        name: &str,
        parent_id: &str,
        local_path: P,
    ) -> Result<Value> {
        let local_path = local_path.as_ref();
        let bytes = std::fs::read(local_path)?;
        let mime = mime_guess::from_path(local_path)
            .first_or_octet_stream()
            .to_string();

        let attributes = json!({ "name": name, "parent": { "id": parent_id } });
        let mut params = Params::new();
        params.insert(
            "attributes".to_string(),
            Value::String(attributes.to_string()),
        );

        let file = FilePart {
            param: "file",
            file_name: name.to_string(),
            mime,
            bytes,
        };
        Ok(self
            .dispatch("UploadFile", params, Some(file))
            .await?
            .into_json())
    }

    /// Delete a file.
    pub async fn delete_file(&self, id: &str, etag: Option<&str>) -> Result<()> {
        let mut params = id_params(id);
        insert_str(&mut params, "if-match", etag);
        self.execute("DeleteFile", params).await?;
        Ok(())
    }

    /// Get the comments on a file.
    pub async fn get_file_comments(
        &self,
        id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let mut params = id_params(id);
        if let Some(limit) = limit {
            params.insert("limit".to_string(), limit.into());
        }
        if let Some(offset) = offset {
            params.insert("offset".to_string(), offset.into());
        }
        Ok(self.execute("GetFileComments", params).await?.into_json())
    }

    /// Retrieve the metadata of a shared item given only its shared link.
    ///
    /// A password may be required depending on the link's permission level.
    pub async fn get_shared_item(
        &self,
        shared_link: &str,
        password: Option<&str>,
        fields: Option<&str>,
    ) -> Result<Value> {
        let mut params = Params::new();
        params.insert(
            "shared_link".to_string(),
            Value::String(shared_link.to_string()),
        );
        insert_str(&mut params, "shared_link_password", password);
        insert_str(&mut params, "fields", fields);
        Ok(self.execute("GetSharedItem", params).await?.into_json())
    }

    /// Get a metadata instance of the given template type on a file.
    pub async fn meta_get_type(&self, id: &str, type_name: &str) -> Result<Value> {
        let mut params = id_params(id);
        params.insert("type".to_string(), Value::String(type_name.to_string()));
        Ok(self.execute("MetaGetType", params).await?.into_json())
    }

    /// Create a metadata instance on a file. `values` become the JSON body.
    pub async fn meta_create_type(
        &self,
        id: &str,
        type_name: &str,
        values: Params,
    ) -> Result<Value> {
        let mut params = values;
        params.insert("id".to_string(), Value::String(id.to_string()));
        params.insert("type".to_string(), Value::String(type_name.to_string()));
        Ok(self.execute("MetaCreateType", params).await?.into_json())
    }

    /// Apply a JSON-patch list of operations to a file's metadata instance.
    pub async fn meta_update_type(
        &self,
        id: &str,
        type_name: &str,
        operations: Vec<Value>,
    ) -> Result<Value> {
        let mut params = id_params(id);
        params.insert("type".to_string(), Value::String(type_name.to_string()));
        params.insert("operations".to_string(), Value::Array(operations));
        Ok(self.execute("MetaUpdateType", params).await?.into_json())
    }
}

fn id_params(id: &str) -> Params {
    let mut params = Params::new();
    params.insert("id".to_string(), Value::String(id.to_string()));
    params
}

fn insert_str(params: &mut Params, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        params.insert(name.to_string(), Value::String(value.to_string()));
    }
}

fn has(params: &Params, name: &str) -> bool {
    params.get(name).is_some_and(|v| !v.is_null())
}

/// Render a path placeholder value. Only scalars may appear in a URL path.
fn path_segment(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(BoxError::InvalidParameter(name.to_string())),
    }
}

/// Serialize a value for the query string, a header, or a form field.
/// Arrays become comma-joined strings.
fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Serialize a value for the JSON body. Arrays are comma-joined; objects
/// stay nested (`parent: {id}`).
fn body_value(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::String(flatten(value)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_scalars() {
        assert_eq!(flatten(&json!("abc")), "abc");
        assert_eq!(flatten(&json!(42)), "42");
        assert_eq!(flatten(&json!(true)), "true");
    }

    #[test]
    fn test_flatten_array_comma_joins() {
        assert_eq!(flatten(&json!(["id", "name", "size"])), "id,name,size");
        assert_eq!(flatten(&json!([1, 2, 3])), "1,2,3");
    }

    #[test]
    fn test_body_value_keeps_objects_nested() {
        let parent = json!({ "id": "0" });
        assert_eq!(body_value(&parent), parent);
        assert_eq!(body_value(&json!(["a", "b"])), json!("a,b"));
    }

    #[test]
    fn test_path_segment_rejects_non_scalars() {
        assert_eq!(path_segment("id", &json!("42")).unwrap(), "42");
        assert_eq!(path_segment("id", &json!(42)).unwrap(), "42");
        assert!(matches!(
            path_segment("id", &json!({ "id": "42" })),
            Err(BoxError::InvalidParameter(name)) if name == "id"
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let builder = BoxClient::builder("token");
        assert_eq!(builder.api_base, API_BASE);
        assert_eq!(builder.upload_base, UPLOAD_BASE);
        assert!(builder.timeout.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let client = BoxClient::builder("token")
            .api_base("http://localhost:8080")
            .upload_base("http://localhost:8081")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.api_base, "http://localhost:8080");
        assert_eq!(client.upload_base, "http://localhost:8081");
    }
}
