//! Server List Ping client.
//!
//! The exchange is one handshake packet announcing the "status" state, one
//! empty status request, and one response carrying a JSON document. Every
//! packet is framed as `VarInt length | VarInt packet id | payload`.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Buf, BufMut, BytesMut};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::address::ServerAddress;
use crate::error::{FetchError, FetchResult};
use crate::motd::Description;
use crate::status::{StatusSnapshot, UNKNOWN_VERSION};

/// Protocol version sent in the handshake. Servers answer status requests
/// for any version.
const PROTOCOL_VERSION: i32 = 47;

/// Handshake "next state" value selecting the status protocol.
const NEXT_STATE_STATUS: i32 = 1;

/// Largest response frame accepted.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Default bound on one whole status exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of status snapshots for validated addresses.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(&self, address: &ServerAddress) -> FetchResult<StatusSnapshot>;
}

/// Queries Java edition servers over TCP.
#[derive(Debug, Clone)]
pub struct JavaPinger {
    timeout: Duration,
}

impl Default for JavaPinger {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl JavaPinger {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query the server listening on `target`. `host` and `port` are only
    /// announced in the handshake; the connection always goes to `target`.
    pub async fn ping(&self, target: SocketAddr, host: &str, port: u16) -> FetchResult<StatusSnapshot> {
        tokio::time::timeout(self.timeout, exchange(target, host, port))
            .await
            .map_err(|_| FetchError::Timeout)?
    }
}

#[async_trait]
impl StatusFetcher for JavaPinger {
    async fn fetch(&self, address: &ServerAddress) -> FetchResult<StatusSnapshot> {
        self.ping(address.socket_addr(), address.host(), address.port())
            .await
    }
}

async fn exchange(target: SocketAddr, host: &str, port: u16) -> FetchResult<StatusSnapshot> {
    let mut stream = TcpStream::connect(target).await?;

    let mut handshake = BytesMut::new();
    put_varint(&mut handshake, 0x00);
    put_varint(&mut handshake, PROTOCOL_VERSION);
    put_string(&mut handshake, host);
    handshake.put_u16(port);
    put_varint(&mut handshake, NEXT_STATE_STATUS);

    let mut request = BytesMut::new();
    put_varint(&mut request, 0x00);

    let mut out = frame(&handshake);
    out.extend_from_slice(&frame(&request));
    stream.write_all(&out).await?;

    let mut response = read_frame(&mut stream).await?;
    let packet_id = get_varint(&mut response)?;
    if packet_id != 0x00 {
        return Err(FetchError::Protocol(format!(
            "unexpected packet id {:#04x}",
            packet_id
        )));
    }

    let json_len = usize::try_from(get_varint(&mut response)?)
        .map_err(|_| FetchError::Protocol("negative string length".to_string()))?;
    if response.remaining() < json_len {
        return Err(FetchError::Protocol("truncated status string".to_string()));
    }

    decode_status(&response[..json_len])
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    version: Option<VersionInfo>,
    #[serde(default)]
    players: Option<PlayersInfo>,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    favicon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayersInfo {
    #[serde(default)]
    online: i64,
    #[serde(default)]
    max: i64,
}

/// Turn the JSON body of a status response into a snapshot.
pub fn decode_status(json: &[u8]) -> FetchResult<StatusSnapshot> {
    let response: StatusResponse = serde_json::from_slice(json)?;
    let (players_online, players_max) = response
        .players
        .map(|p| (p.online, p.max))
        .unwrap_or((0, 0));

    Ok(StatusSnapshot {
        online: true,
        description: Description::from_json(&response.description),
        players_online,
        players_max,
        version_name: response
            .version
            .and_then(|v| v.name)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        icon: response.favicon,
    })
}

fn put_varint(buf: &mut BytesMut, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !0x7f == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
}

fn get_varint(buf: &mut impl Buf) -> FetchResult<i32> {
    let mut value: u32 = 0;
    for shift in (0..35).step_by(7) {
        if !buf.has_remaining() {
            return Err(FetchError::Protocol("truncated varint".to_string()));
        }
        let byte = buf.get_u8();
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(FetchError::Protocol("varint too long".to_string()))
}

fn put_string(buf: &mut BytesMut, s: &str) {
    put_varint(buf, s.len() as i32);
    buf.put_slice(s.as_bytes());
}

/// Prefix `payload` with its VarInt length.
fn frame(payload: &[u8]) -> BytesMut {
    let mut framed = BytesMut::with_capacity(payload.len() + 5);
    put_varint(&mut framed, payload.len() as i32);
    framed.put_slice(payload);
    framed
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> FetchResult<i32> {
    let mut value: u32 = 0;
    for shift in (0..35).step_by(7) {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(FetchError::Protocol("varint too long".to_string()))
}

/// Read one length-prefixed packet body.
async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> FetchResult<BytesMut> {
    let len = read_varint(reader).await?;
    let len = usize::try_from(len)
        .ok()
        .filter(|len| (1..=MAX_FRAME_LEN).contains(len))
        .ok_or_else(|| FetchError::Protocol(format!("invalid frame length {}", len)))?;

    let mut body = BytesMut::zeroed(len);
    reader.read_exact(&mut body).await?;
    Ok(body)
}
