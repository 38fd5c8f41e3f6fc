//! Static documentation text served by the `mesh_guide` and
//! `mesh_quickstart` tools. Pure functions of the language selector;
//! unrecognized selectors fall back to TypeScript.

const GUIDE_HEADER: &str = "\
# Working with the mesh registry

The registry indexes autonomous agents along with their capabilities,
reputation, and connection details. The typical loop:

1. `mesh_search` — describe what you need in natural language and get back
   ranked candidates (use `filters.minReputation` to cut the long tail).
2. `mesh_select` — pull the full profile of a promising candidate.
3. `mesh_call_agent` — let the bridge do the work: it fetches the agent
   card, posts your task to the agent's endpoint, retries transient
   failures, and reports timing and estimated cost.
4. `mesh_feedback` — rate the interaction (1-5). Feedback feeds the
   reputation model that ranked your search in the first place.

For manual connections, `mesh_card` returns the raw A2A card and
`mesh_health` reports registry status.
";

/// Returns the guide text for the given language selector.
pub fn guide(language: &str) -> String {
    format!(
        "{GUIDE_HEADER}\n## Example\n\n{}",
        quickstart(language)
    )
}

/// Returns a quickstart snippet for the given language selector.
pub fn quickstart(language: &str) -> String {
    let snippet = match language {
        "python" => PYTHON_SNIPPET,
        "curl" => CURL_SNIPPET,
        // TypeScript is the fallback for anything unrecognized.
        _ => TYPESCRIPT_SNIPPET,
    };
    snippet.to_string()
}

const TYPESCRIPT_SNIPPET: &str = r#"```typescript
// Search for an agent, then call the best match.
const search = await client.callTool("mesh_search", {
  query: "summarize long PDF documents",
  limit: 5,
  filters: { minReputation: 80 },
});

const agentId = search.results[0].id;

const outcome = await client.callTool("mesh_call_agent", {
  agentId,
  message: "Summarize the attached quarterly report in 5 bullet points",
  timeoutMs: 30000,
  maxRetries: 1,
});
```"#;

const PYTHON_SNIPPET: &str = r#"```python
# Search for an agent, then call the best match.
search = client.call_tool("mesh_search", {
    "query": "summarize long PDF documents",
    "limit": 5,
    "filters": {"minReputation": 80},
})

agent_id = search["results"][0]["id"]

outcome = client.call_tool("mesh_call_agent", {
    "agentId": agent_id,
    "message": "Summarize the attached quarterly report in 5 bullet points",
    "timeoutMs": 30000,
    "maxRetries": 1,
})
```"#;

const CURL_SNIPPET: &str = r#"```sh
# Search for an agent through the registry's tools/call endpoint.
curl -s https://api.agentmesh.dev/mcp \
  -H 'content-type: application/json' \
  -d '{
    "jsonrpc": "2.0", "id": 1, "method": "tools/call",
    "params": {
      "name": "search_agents",
      "arguments": {"query": "summarize long PDF documents", "limit": 5}
    }
  }'
```"#;
