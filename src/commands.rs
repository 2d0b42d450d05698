//! Static command table mapping operation names to Box REST endpoints.
//!
//! Every operation the client can perform is declared here as data: an HTTP
//! method, a host, a path template with `{name}` placeholders, and the list
//! of parameters the operation recognizes together with where each one is
//! placed in the outgoing request. The table is built once, never mutated,
//! and can be tested without touching the dispatcher.

use reqwest::Method;

/// Where a parameter is placed in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Substituted into a `{name}` placeholder in the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Inserted as a field of the JSON body object.
    Body,
    /// The parameter's value becomes the entire JSON body, untouched.
    RawBody,
    /// Sent as a request header named after the parameter.
    Header,
    /// Sent as a multipart form field.
    Multipart,
}

/// Which base URL an operation is issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// The general API host.
    Api,
    /// The dedicated upload host.
    Upload,
}

/// Policy for parameters an operation does not declare.
///
/// The table makes the permissive pass-through of the Box API explicit:
/// update-style operations accept arbitrary caller fields in their JSON
/// body, everything else drops undeclared parameters silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraParams {
    /// Undeclared parameters are silently dropped.
    Drop,
    /// Undeclared parameters become fields of the JSON body.
    Body,
}

/// A single parameter accepted by an operation.
#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub placement: Placement,
    pub required: bool,
}

/// A named operation bound to an HTTP method and path template.
#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub method: Method,
    pub host: Host,
    pub path: &'static str,
    pub params: &'static [ParamSpec],
    pub extra: ExtraParams,
    /// Overrides the body content type when set (JSON-patch updates).
    pub content_type: Option<&'static str>,
}

const fn required(name: &'static str, placement: Placement) -> ParamSpec {
    ParamSpec {
        name,
        placement,
        required: true,
    }
}

const fn optional(name: &'static str, placement: Placement) -> ParamSpec {
    ParamSpec {
        name,
        placement,
        required: false,
    }
}

const fn op(
    name: &'static str,
    method: Method,
    path: &'static str,
    params: &'static [ParamSpec],
) -> Operation {
    Operation {
        name,
        method,
        host: Host::Api,
        path,
        params,
        extra: ExtraParams::Drop,
        content_type: None,
    }
}

/// All operations known to the client.
pub static COMMANDS: &[Operation] = &[
    op(
        "SearchFolder",
        Method::GET,
        "/search",
        &[
            required("ancestor_folder_ids", Placement::Query),
            optional("type", Placement::Query),
            optional("fields", Placement::Query),
            optional("file_extensions", Placement::Query),
            optional("mdfilters", Placement::Query),
            optional("limit", Placement::Query),
            optional("offset", Placement::Query),
        ],
    ),
    op(
        "GetFolderItems",
        Method::GET,
        "/folders/{id}/items",
        &[
            required("id", Placement::Path),
            optional("fields", Placement::Query),
            optional("limit", Placement::Query),
            optional("offset", Placement::Query),
        ],
    ),
    op(
        "CreateFolder",
        Method::POST,
        "/folders",
        &[
            required("name", Placement::Body),
            required("parent", Placement::Body),
        ],
    ),
    op(
        "GetFolder",
        Method::GET,
        "/folders/{id}",
        &[required("id", Placement::Path)],
    ),
    op(
        "CopyFolder",
        Method::POST,
        "/folders/{id}/copy",
        &[
            required("id", Placement::Path),
            required("parent", Placement::Body),
            optional("name", Placement::Body),
        ],
    ),
    op(
        "DeleteFolder",
        Method::DELETE,
        "/folders/{id}",
        &[
            required("id", Placement::Path),
            optional("recursive", Placement::Query),
            optional("if-match", Placement::Header),
        ],
    ),
    Operation {
        name: "UpdateFolder",
        method: Method::PUT,
        host: Host::Api,
        path: "/folders/{id}",
        params: &[
            required("id", Placement::Path),
            optional("if-match", Placement::Header),
        ],
        extra: ExtraParams::Body,
        content_type: None,
    },
    op(
        "GetFolderDiscussions",
        Method::GET,
        "/folders/{id}/discussions",
        &[required("id", Placement::Path)],
    ),
    op(
        "GetFolderCollaborations",
        Method::GET,
        "/folders/{id}/collaborations",
        &[required("id", Placement::Path)],
    ),
    op(
        "GetTrashItems",
        Method::GET,
        "/folders/trash/items",
        &[
            optional("fields", Placement::Query),
            optional("limit", Placement::Query),
            optional("offset", Placement::Query),
        ],
    ),
    op(
        "DeleteTrashedFolder",
        Method::DELETE,
        "/folders/{id}/trash",
        &[required("id", Placement::Path)],
    ),
    op(
        "GetFile",
        Method::GET,
        "/files/{id}",
        &[
            required("id", Placement::Path),
            optional("fields", Placement::Query),
        ],
    ),
    op(
        "DownloadFile",
        Method::GET,
        "/files/{id}/content",
        &[
            required("id", Placement::Path),
            optional("version", Placement::Query),
        ],
    ),
    Operation {
        name: "UploadFile",
        method: Method::POST,
        host: Host::Upload,
        path: "/files/content",
        params: &[
            required("attributes", Placement::Multipart),
            required("file", Placement::Multipart),
        ],
        extra: ExtraParams::Drop,
        content_type: None,
    },
    op(
        "DeleteFile",
        Method::DELETE,
        "/files/{id}",
        &[
            required("id", Placement::Path),
            optional("if-match", Placement::Header),
        ],
    ),
    op(
        "GetFileComments",
        Method::GET,
        "/files/{id}/comments",
        &[
            required("id", Placement::Path),
            optional("limit", Placement::Query),
            optional("offset", Placement::Query),
        ],
    ),
    op(
        "GetSharedItem",
        Method::GET,
        "/shared_items",
        &[
            required("shared_link", Placement::Header),
            optional("shared_link_password", Placement::Header),
            optional("fields", Placement::Query),
        ],
    ),
    op(
        "MetaGetType",
        Method::GET,
        "/files/{id}/metadata/{type}",
        &[
            required("id", Placement::Path),
            required("type", Placement::Path),
        ],
    ),
    Operation {
        name: "MetaCreateType",
        method: Method::POST,
        host: Host::Api,
        path: "/files/{id}/metadata/{type}",
        params: &[
            required("id", Placement::Path),
            required("type", Placement::Path),
        ],
        extra: ExtraParams::Body,
        content_type: None,
    },
    Operation {
        name: "MetaUpdateType",
        method: Method::PUT,
        host: Host::Api,
        path: "/files/{id}/metadata/{type}",
        params: &[
            required("id", Placement::Path),
            required("type", Placement::Path),
            required("operations", Placement::RawBody),
        ],
        extra: ExtraParams::Drop,
        content_type: Some("application/json-patch+json"),
    },
];

/// Look up an operation definition by name.
pub fn lookup(name: &str) -> Option<&'static Operation> {
    COMMANDS.iter().find(|op| op.name == name)
}
