use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        Self { _tmp: tmp, home }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("workbridge");
        cmd.env("HOME", &self.home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_api(&self, api: &str, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .arg("--api")
            .arg(api)
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_err(&self, api: Option<&str>, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        cmd.arg("--json");
        if let Some(api) = api {
            cmd.arg("--api").arg(api);
        }
        let out = cmd
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn write_form(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.home.join(name);
        fs::write(&path, serde_json::to_string_pretty(value).expect("serialize form"))
            .expect("write form file");
        path
    }
}

pub fn filled_intake_form() -> Value {
    serde_json::json!({
        "contact_name": "Dana Cruz",
        "email": "dana@acme.io",
        "phone": "+1 555 0100",
        "company_name": "Acme Outdoors",
        "industry": "ecommerce",
        "team_size": "11-50",
        "current_challenges": "our customer support tickets are overwhelming",
        "monthly_budget": "$5,000",
        "goals": ["reduce response time"],
        "timeline": "within a month"
    })
}

pub fn form_path(env: &TestEnv, name: &str, value: &Value) -> String {
    env.write_form(name, value)
        .to_str()
        .expect("form path utf8")
        .to_string()
}

/// Minimal one-connection HTTP responder for gateway tests. Records the raw
/// request (headers + body) it served.
pub struct StubServer {
    pub base: String,
    handle: Option<JoinHandle<String>>,
}

impl StubServer {
    pub fn one_shot(status: u16, content_type: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let base = format!("http://{}", listener.local_addr().expect("stub addr"));
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason(status),
            content_type,
            body.len(),
            body
        );
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let request = read_request(&mut stream);
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            request
        });
        Self {
            base,
            handle: Some(handle),
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::one_shot(status, "application/json", body)
    }

    /// Joins the server thread and returns the raw request it served.
    pub fn finish(mut self) -> String {
        self.handle
            .take()
            .expect("stub already finished")
            .join()
            .expect("stub thread")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).expect("read request line") == 0 {
            return request;
        }
        if line == "\r\n" {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        request.push_str(&line);
    }
    if content_length > 0 {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("read request body");
        request.push_str(&String::from_utf8_lossy(&body));
    }
    request
}

/// An address that refuses connections: bind, note the port, drop the socket.
pub fn refused_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway");
    let addr = listener.local_addr().expect("throwaway addr");
    drop(listener);
    format!("http://{}", addr)
}

#[allow(dead_code)]
pub fn config_path(home: &Path) -> PathBuf {
    home.join(".config/workbridge/config.toml")
}
