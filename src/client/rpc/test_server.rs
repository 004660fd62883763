use std::{
    collections::{BTreeMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/// A request received by [TestServer].
#[derive(Clone, Debug)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

type Routes = Arc<Mutex<BTreeMap<String, VecDeque<(u16, String)>>>>;
type Requests = Arc<Mutex<Vec<ReceivedRequest>>>;

/// HTTP/1.1 server on a local port answering each path from a scripted list of
/// `(status, body)` pairs.
///
/// Responses of a path are used in order and the last one repeats once the others are used up.
/// Paths without a script get an empty `404`.
pub struct TestServer {
    addr: SocketAddr,
    requests: Requests,
}

impl TestServer {
    pub async fn start(script: Vec<(&str, Vec<(u16, &str)>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let routes: Routes = Arc::new(Mutex::new(
            script
                .into_iter()
                .map(|(path, responses)| {
                    let responses = responses
                        .into_iter()
                        .map(|(status, body)| (status, body.to_string()))
                        .collect();
                    (path.to_string(), responses)
                })
                .collect(),
        ));
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));

        let (server_routes, server_requests) = (routes.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(answer(stream, server_routes.clone(), server_requests.clone()));
            }
        });

        Self { addr, requests }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns the requests received for `path`, oldest first.
    pub fn requests_to(&self, path: &str) -> Vec<ReceivedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }
}

async fn answer(mut stream: TcpStream, routes: Routes, requests: Requests) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {},
            }
        }
    }

    while buffer.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => buffer.extend_from_slice(&chunk[..read]),
        }
    }

    requests.lock().unwrap().push(ReceivedRequest {
        method,
        path: path.clone(),
        authorization,
    });

    let (status, body) = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&path) {
            Some(responses) if responses.len() > 1 => responses.pop_front().unwrap(),
            Some(responses) => responses.front().cloned().unwrap_or((404, String::new())),
            None => (404, String::new()),
        }
    };

    let response = format!(
        "HTTP/1.1 {status} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
