//! npm documentation fetcher MCP implementation.
//!
//! Binds the README resolution pipeline to a single MCP tool,
//! `get_docs_for_npm_package`. Pipeline errors surface as error content
//! blocks on the tool response; the call itself always completes.

use rmcp::model::{Implementation, ListPromptsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, Error as McpError, ServerHandler, model::ServerInfo, tool};
use std::sync::Arc;

use crate::pipeline::DocsPipeline;
use crate::registry::{DocContent, DocsFetchError, PackageDocsParams};

#[derive(Clone)]
pub struct NpmDocsServer {
    pipeline: Arc<DocsPipeline>,
}

// create a static toolbox to store the tool attributes
#[tool(tool_box)]
impl NpmDocsServer {
    pub fn new() -> Self {
        Self {
            pipeline: Arc::new(DocsPipeline::new()),
        }
    }

    #[allow(dead_code)]
    pub fn with_pipeline(pipeline: DocsPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    #[tool(description = "Get the docs for an npm package")]
    async fn get_docs_for_npm_package(
        &self,
        #[tool(aggr)] params: PackageDocsParams,
    ) -> Result<DocContent, DocsFetchError> {
        self.pipeline.fetch_docs(&params.package_name).await
    }
}

// impl call_tool and list_tool by querying static toolbox
#[tool(tool_box)]
impl ServerHandler for NpmDocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server fetches README documentation for npm packages. \
                Use the 'get_docs_for_npm_package' tool with a package name; \
                the README is resolved from the package's GitHub repository \
                when one is listed, falling back to the published tarball."
                    .to_string(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        // We don't use prompts in this implementation
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: vec![],
        })
    }
}
