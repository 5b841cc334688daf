// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use flashquiz_core::error::Fallible;
use flashquiz_core::error::fail;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio::time::timeout;

// max-age is one week in seconds.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=604800, immutable";

/// How long to keep trying to reach a server before giving up.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll until something accepts connections on `host:port`.
pub async fn wait_for_server(host: &str, port: u16) -> Fallible<()> {
    let address = format!("{host}:{port}");
    let attempt = async {
        while TcpStream::connect(&address).await.is_err() {
            sleep(Duration::from_millis(1)).await;
        }
    };
    match timeout(CONNECT_TIMEOUT, attempt).await {
        Ok(()) => Ok(()),
        Err(_) => fail(format!("no server listening on {address}")),
    }
}

#[cfg(test)]
mod tests {
    use portpicker::pick_unused_port;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_wait_for_listening_server() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let _listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
        wait_for_server("127.0.0.1", port).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_eventually() {
        let port = pick_unused_port().unwrap();
        let result = wait_for_server("127.0.0.1", port).await;
        assert!(result.is_err());
    }
}
