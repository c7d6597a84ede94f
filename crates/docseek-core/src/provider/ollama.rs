use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{DocseekError, Result};
use crate::llm_io::{extract_embedding, extract_llm_content, parse_local_loopback_endpoint};

use super::{CompletionOptions, ModelProvider};

/// Blocking client for a local Ollama server. Only loopback endpoints are
/// accepted, so document text never leaves the machine.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    embeddings_url: Url,
    chat_url: Url,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Result<Self> {
        let base =
            parse_local_loopback_endpoint(endpoint, "ollama endpoint").map_err(DocseekError::Validation)?;
        let embeddings_url = join_endpoint(&base, "api/embeddings")?;
        let chat_url = join_endpoint(&base, "api/chat")?;
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms.max(1)))
            .build()
            .map_err(|err| DocseekError::Internal(format!("ollama client build failed: {err}")))?;
        Ok(Self {
            client,
            embeddings_url,
            chat_url,
        })
    }

    fn post_json(&self, url: &Url, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .map_err(|err| DocseekError::Provider(format!("ollama request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DocseekError::Provider(format!(
                "ollama non-success status: {status}"
            )));
        }
        response
            .json::<Value>()
            .map_err(|err| DocseekError::Provider(format!("ollama invalid json response: {err}")))
    }
}

impl ModelProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>> {
        let payload = serde_json::json!({
            "model": model,
            "prompt": text,
        });
        let value = self.post_json(&self.embeddings_url, &payload)?;
        let embedding = extract_embedding(&value).ok_or_else(|| {
            DocseekError::Provider("ollama embedding response has no vector".to_string())
        })?;
        if embedding.is_empty() {
            return Err(DocseekError::Provider(format!(
                "ollama returned an empty embedding for model {model}"
            )));
        }
        debug!(model, dim = embedding.len(), "ollama embedding");
        Ok(embedding)
    }

    fn complete(&self, prompt: &str, model: &str, options: &CompletionOptions) -> Result<String> {
        let payload = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": options.max_output_tokens
            }
        });
        let value = self.post_json(&self.chat_url, &payload)?;
        extract_llm_content(&value).ok_or_else(|| {
            DocseekError::Provider("ollama chat response has no content".to_string())
        })
    }
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|err| DocseekError::Validation(format!("invalid ollama endpoint path: {err}")))
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use super::*;

    /// Serves exactly one HTTP response and reports the request line and body.
    fn serve_once(status: &str, body: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let status = status.to_string();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("header");
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().expect("content-length");
                }
            }
            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).expect("body");

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write");
            stream.flush().expect("flush");
            tx.send((
                request_line.trim_end().to_string(),
                String::from_utf8(request_body).expect("utf8"),
            ))
            .expect("send");
        });
        (format!("http://{addr}"), rx)
    }

    #[test]
    fn embed_posts_model_and_prompt() {
        let (endpoint, rx) = serve_once("200 OK", r#"{"embedding":[0.25,0.5,0.75]}"#);
        let provider = OllamaProvider::new(&endpoint, 2_000).expect("provider");

        let vector = provider.embed("budget", "nomic-embed-text").expect("embed");
        assert_eq!(vector, vec![0.25, 0.5, 0.75]);

        let (request_line, body) = rx.recv().expect("request");
        assert!(request_line.starts_with("POST /api/embeddings"));
        let body: Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(body["model"], "nomic-embed-text");
        assert_eq!(body["prompt"], "budget");
    }

    #[test]
    fn empty_embedding_is_a_provider_error() {
        let (endpoint, _rx) = serve_once("200 OK", r#"{"embedding":[]}"#);
        let provider = OllamaProvider::new(&endpoint, 2_000).expect("provider");
        let err = provider.embed("budget", "m").expect_err("empty vector");
        assert!(matches!(err, DocseekError::Provider(_)));
    }

    #[test]
    fn complete_reads_chat_message_content() {
        let (endpoint, rx) = serve_once(
            "200 OK",
            r#"{"message":{"role":"assistant","content":"{\"synonyms\":[\"cv\"]}"}}"#,
        );
        let provider = OllamaProvider::new(&endpoint, 2_000).expect("provider");
        let options = CompletionOptions {
            temperature: 0.2,
            max_output_tokens: 64,
        };

        let text = provider
            .complete("expand resume", "llama3.2:3b", &options)
            .expect("complete");
        assert_eq!(text, r#"{"synonyms":["cv"]}"#);

        let (request_line, body) = rx.recv().expect("request");
        assert!(request_line.starts_with("POST /api/chat"));
        let body: Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 64);
    }

    #[test]
    fn non_success_status_is_recoverable() {
        let (endpoint, _rx) = serve_once("404 Not Found", r#"{"error":"model not found"}"#);
        let provider = OllamaProvider::new(&endpoint, 2_000).expect("provider");
        let err = provider.embed("budget", "missing").expect_err("404");
        assert!(err.is_recoverable());
    }

    #[test]
    fn unreachable_server_is_recoverable() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let provider = OllamaProvider::new(&format!("http://{addr}"), 500).expect("provider");
        let err = provider.embed("budget", "m").expect_err("refused");
        assert!(err.is_recoverable());
    }

    #[test]
    fn endpoint_paths_are_joined_under_base() {
        let base = Url::parse("http://127.0.0.1:11434/ollama").expect("url");
        assert_eq!(
            join_endpoint(&base, "api/chat").expect("join").as_str(),
            "http://127.0.0.1:11434/ollama/api/chat"
        );
    }
}
