// Article prompt pipeline.
// `builder` is pure and deterministic; everything that talks to the LLM
// lives in `pipeline` and goes through `llm_client`.

pub mod builder;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
