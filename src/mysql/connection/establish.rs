//! Physical connect through the authentication sub-protocol.

use crate::error::{Error, Result};
use crate::io::{Decode, Encode};
use crate::log::default_handler;
use crate::mysql::auth::{self, RsaPadding};
use crate::mysql::connection::{ConnectionState, MySqlConnection, SessionState};
use crate::mysql::options::MySqlConnectOptions;
use crate::mysql::protocol::{
    AuthPlugin, AuthSwitchRequest, Capabilities, ComChangeUser, ErrPacket, HandshakeResponse41,
    HandshakeV10, OkPacket, SslRequest,
};
use crate::mysql::stream::PacketStream;
use crate::net::MaybeTlsStream;

const MAX_PACKET_SIZE_CLIENT: u32 = 0xFF_FF_FF;
const DEFAULT_COLLATION: u8 = 45; // utf8mb4_general_ci

/// `connect(options)`: dials the transport, negotiates TLS if required, and runs
/// the authentication handshake.
pub async fn connect(options: &MySqlConnectOptions) -> Result<MySqlConnection> {
    let socket = tokio::time::timeout(
        options.connect_timeout,
        MaybeTlsStream::connect(&options.host, options.port),
    )
    .await
    .map_err(|_| Error::configuration("timed out connecting to the server"))??;

    socket.set_keepalive(options.tcp_keepalive)?;

    let mut stream = PacketStream::new(socket);

    let handshake = HandshakeV10::decode(stream.read_packet().await?)?;

    let mut capabilities = Capabilities::required() & handshake.server_capabilities;

    if options.database.is_some() {
        capabilities |= Capabilities::CONNECT_WITH_DB & handshake.server_capabilities;
    }
    if !options.connection_attributes.is_empty() {
        capabilities |= Capabilities::CONNECT_ATTRS & handshake.server_capabilities;
    }
    if options.enable_local_infile {
        capabilities |= Capabilities::LOCAL_FILES & handshake.server_capabilities;
    }

    let mut is_tls = false;

    if options.tls_required() {
        if !handshake.server_capabilities.contains(Capabilities::SSL) {
            return Err(Error::configuration(
                "TLS was required but the server does not advertise CLIENT_SSL",
            ));
        }

        capabilities |= Capabilities::SSL;

        let ssl_request = SslRequest {
            max_packet_size: MAX_PACKET_SIZE_CLIENT,
            collation: DEFAULT_COLLATION,
        };

        let mut buf = Vec::new();
        ssl_request.encode(&mut buf, capabilities);
        stream.write_packet(&buf).await?;

        let sequence = stream.sequence_id();
        let socket = stream.into_socket();
        let upgraded = socket
            .upgrade(&options.host, None, &options.tls_config())
            .await?;

        stream = PacketStream::new(upgraded);
        stream.set_sequence_id(sequence);
        is_tls = true;
    }

    let auth_plugin = handshake.auth_plugin.unwrap_or(AuthPlugin::MySqlNativePassword);
    let scramble = handshake.auth_plugin_data.to_vec();
    let password = options.password.as_deref().unwrap_or("");

    let auth_response = initial_auth_response(auth_plugin, password, &scramble, is_tls);

    let response = HandshakeResponse41 {
        max_packet_size: MAX_PACKET_SIZE_CLIENT,
        collation: DEFAULT_COLLATION,
        username: &options.username,
        database: options.database.as_deref(),
        auth_plugin_name: Some(auth_plugin.name()),
        auth_response: &auth_response,
        connection_attrs: &options.connection_attributes,
    };

    let mut buf = Vec::new();
    response.encode(&mut buf, capabilities);
    stream.write_packet(&buf).await?;

    let exchange = drive_auth_exchange(
        &mut stream,
        auth_plugin,
        password,
        scramble,
        capabilities,
        &handshake.server_version,
        is_tls,
    )
    .await?;

    Ok(MySqlConnection {
        stream,
        capabilities,
        state: ConnectionState::Idle,
        server_version: handshake.server_version,
        connection_id: handshake.connection_id,
        collation: DEFAULT_COLLATION,
        session: SessionState::default(),
        log_handler: default_handler(),
        username: options.username.as_str().into(),
        database: options.database.as_deref().map(Into::into),
        auth_plugin: exchange.plugin,
        auth_scramble: exchange.scramble.into_boxed_slice(),
        pending_multi_result: None,
    })
}

/// `change_user(user, password, database?)`: re-runs authentication over the
/// already-open socket, replaying the scramble established at connect time.
pub(super) async fn change_user(
    conn: &mut MySqlConnection,
    username: &str,
    password: &str,
    database: Option<&str>,
) -> Result<()> {
    let is_tls = conn.stream.socket_mut().is_tls();
    let scramble = conn.auth_scramble.to_vec();
    let auth_response = initial_auth_response(conn.auth_plugin, password, &scramble, is_tls);

    let command = ComChangeUser {
        username,
        auth_response: &auth_response,
        database,
        collation: conn.collation,
        auth_plugin_name: conn.auth_plugin.name(),
    };

    let mut buf = Vec::new();
    command.encode(&mut buf, conn.capabilities);
    conn.stream.reset_sequence();
    conn.stream.write_packet(&buf).await?;

    let exchange = drive_auth_exchange(
        &mut conn.stream,
        conn.auth_plugin,
        password,
        scramble,
        conn.capabilities,
        &conn.server_version,
        is_tls,
    )
    .await?;

    conn.auth_plugin = exchange.plugin;
    conn.auth_scramble = exchange.scramble.into_boxed_slice();

    Ok(())
}

struct AuthExchangeResult {
    plugin: AuthPlugin,
    scramble: Vec<u8>,
}

/// Computes the auth-response bytes to put in the initial `HandshakeResponse41`/
/// `COM_CHANGE_USER` packet, before any `AuthSwitchRequest`/full-auth round trip.
fn initial_auth_response(plugin: AuthPlugin, password: &str, scramble: &[u8], is_tls: bool) -> Vec<u8> {
    match plugin {
        AuthPlugin::MySqlNativePassword => auth::native_password(password.as_bytes(), scramble),
        AuthPlugin::CachingSha2Password => auth::caching_sha2_password(password.as_bytes(), scramble),
        AuthPlugin::Sha256Password => {
            if password.is_empty() {
                Vec::new()
            } else if is_tls {
                let mut buf = password.as_bytes().to_vec();
                buf.push(0);
                buf
            } else {
                // Requests the server's RSA public key; the reply carries it in an `AuthMoreData` packet.
                vec![0x01]
            }
        }
    }
}

/// Drives the remainder of the authentication exchange after the initial response has been
/// sent: `AuthSwitchRequest` restarts, `caching_sha2_password`'s fast-auth status byte, and the
/// RSA public-key full-auth path.
async fn drive_auth_exchange(
    stream: &mut PacketStream,
    mut plugin: AuthPlugin,
    password: &str,
    mut scramble: Vec<u8>,
    capabilities: Capabilities,
    server_version: &str,
    is_tls: bool,
) -> Result<AuthExchangeResult> {
    loop {
        let packet = stream.read_packet().await?;

        match packet.first().copied() {
            Some(0x00) => {
                OkPacket::read(packet, capabilities)?;
                return Ok(AuthExchangeResult { plugin, scramble });
            }

            Some(0xff) => {
                let err = ErrPacket::decode(packet)?;
                return Err(Error::AuthenticationFailed(err.error_message));
            }

            Some(0xfe) if packet.len() > 1 => {
                let switch = AuthSwitchRequest::decode(packet)?;
                plugin = switch.auth_plugin;
                scramble = switch.auth_plugin_data.to_vec();

                let response = initial_auth_response(plugin, password, &scramble, is_tls);
                stream.write_packet(&response).await?;
            }

            // `caching_sha2_password` fast-auth status: 0x01 0x03 (cached hit, OK follows) or
            // 0x01 0x04 (cache miss, perform full authentication).
            Some(0x01) if packet.len() == 2 => match packet[1] {
                0x03 => continue,
                0x04 => {
                    if is_tls {
                        let mut cleartext = password.as_bytes().to_vec();
                        cleartext.push(0);
                        stream.write_packet(&cleartext).await?;
                    } else {
                        stream.write_packet(&[0x02]).await?;
                    }
                }
                other => {
                    return Err(Error::protocol(format!(
                        "unexpected caching_sha2_password status byte 0x{other:02X}"
                    )))
                }
            },

            // `AuthMoreData` carrying the server's RSA public key in PEM.
            Some(0x01) => {
                let pem = std::str::from_utf8(&packet[1..]).map_err(|_| {
                    Error::protocol("server's RSA public key was not valid UTF-8")
                })?;

                let padding = choose_rsa_padding(plugin, server_version);
                let encrypted = auth::encrypt_with_public_key(password, &scramble, pem, padding)?;
                stream.write_packet(&encrypted).await?;
            }

            Some(other) => {
                return Err(Error::protocol(format!(
                    "unexpected byte 0x{other:02X} while authenticating"
                )))
            }

            None => return Err(Error::protocol("empty packet while authenticating")),
        }
    }
}

/// Which RSA padding scheme to use when encrypting the password for the public-key exchange.
/// `caching_sha2_password` has used PKCS#1 v1.5 since its introduction in MySQL 8.0;
/// `sha256_password` switched from OAEP to PKCS#1 v1.5 in MySQL 8.0.5.
fn choose_rsa_padding(plugin: AuthPlugin, server_version: &str) -> RsaPadding {
    if plugin == AuthPlugin::CachingSha2Password {
        return RsaPadding::Pkcs1v15;
    }

    let is_modern = server_version
        .split(['.', '-'])
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .map(|major| major >= 8)
        .unwrap_or(false);

    if is_modern {
        RsaPadding::Pkcs1v15
    } else {
        RsaPadding::Oaep
    }
}
