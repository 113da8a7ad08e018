//! Full-pipeline test: staged generation over a scripted client, file
//! extraction from the final response, and persistence to a temp folder.
//! No network involved.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use codesmith::contexts::{
    extract_files, GenerationCall, GenerationRequest, ModelInvoker, NoopObserver, Sleeper,
    StagedGenerator, TransportError,
};
use codesmith::workspace;

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// Plays back a fixed sequence of responses and records every prompt.
struct ScriptedClient {
    responses: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedClient {
    fn new(mut responses: Vec<String>) -> Self {
        responses.reverse();
        Self {
            responses: RefCell::new(responses),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl GenerationCall for ScriptedClient {
    fn call(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        self.prompts.borrow_mut().push(request.user_prompt.clone());
        self.responses
            .borrow_mut()
            .pop()
            .ok_or_else(|| TransportError::Network("script exhausted".to_string()))
    }
}

const FINAL_RESPONSE: &str = "\
Here is the complete implementation.

**src/app.js**

```js
const express = require('express');
const app = express();

module.exports = app;
```

// filename: src/config/db.js
```js
module.exports = { host: 'localhost' };
```

```js:src/routes/users.js
router.get('/', list);
```
";

#[test]
fn pipeline_generates_extracts_and_persists() {
    let client = ScriptedClient::new(vec![
        "scaffold outline".to_string(),
        "expanded models".to_string(),
        FINAL_RESPONSE.to_string(),
    ]);
    let invoker = ModelInvoker::with_sleeper(client, 3, 2000, NoSleep);
    let generator = StagedGenerator::new(invoker);

    let response = generator
        .generate("system prompt", "base prompt", &NoopObserver)
        .expect("staged generation should succeed");

    assert_eq!(response, FINAL_RESPONSE);

    let files = extract_files(&response);
    assert_eq!(files.len(), 3);
    assert_eq!(files[0].path, "src/app.js");
    assert_eq!(files[1].path, "src/config/db.js");
    assert_eq!(files[2].path, "src/routes/users.js");
    assert!(files[0].content.contains("const express"));

    let root = PathBuf::from(format!("/tmp/codesmith_pipeline_{}", std::process::id()));
    let representative =
        workspace::save_files(&root, "proj", "index.js", &response, &files).unwrap();

    assert_eq!(representative, root.join("proj/src/app.js"));
    assert_eq!(
        fs::read_to_string(root.join("proj/src/routes/users.js")).unwrap(),
        "router.get('/', list);"
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn pipeline_failure_surfaces_as_exhaustion() {
    // Only one response scripted: stage 2 fails every attempt.
    let client = ScriptedClient::new(vec!["scaffold outline".to_string()]);
    let invoker = ModelInvoker::with_sleeper(client, 2, 2000, NoSleep);
    let generator = StagedGenerator::new(invoker);

    let err = generator
        .generate("system prompt", "base prompt", &NoopObserver)
        .expect_err("stage 2 should exhaust its retries");

    // Initial attempt plus two retries.
    assert_eq!(err.attempts, 3);
}

#[test]
fn degenerate_response_still_produces_a_file() {
    let response = "```\nconsole.log('hello');\n```";
    let files = extract_files(response);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "app.js");

    let root = PathBuf::from(format!("/tmp/codesmith_degenerate_{}", std::process::id()));
    workspace::save_files(&root, "proj", "index.js", response, &files).unwrap();

    assert_eq!(
        fs::read_to_string(root.join("proj/app.js")).unwrap(),
        "console.log('hello');\n"
    );

    let _ = fs::remove_dir_all(&root);
}
