//! Realtime socket configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound for the per-connection outbound queue.
pub const MAX_OUTBOUND_BUFFER: usize = 4096;

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Route the WebSocket upgrade is mounted on
    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Frames queued per connection before emits to it are dropped
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Require a bearer token in the handshake that matches the claimed identity
    #[serde(default)]
    pub verify_handshake_token: bool,
}

impl RealtimeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.socket_path.starts_with('/') {
            return Err(ValidationError::InvalidSocketPath);
        }
        if self.outbound_buffer == 0 || self.outbound_buffer > MAX_OUTBOUND_BUFFER {
            return Err(ValidationError::InvalidOutboundBuffer(MAX_OUTBOUND_BUFFER));
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            outbound_buffer: default_outbound_buffer(),
            verify_handshake_token: false,
        }
    }
}

fn default_socket_path() -> String {
    "/socket".to_string()
}

fn default_outbound_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_config_defaults() {
        let config = RealtimeConfig::default();
        assert_eq!(config.socket_path, "/socket");
        assert_eq!(config.outbound_buffer, 64);
        assert!(!config.verify_handshake_token);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_socket_path_rejected() {
        let config = RealtimeConfig {
            socket_path: "socket".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSocketPath));
    }

    #[test]
    fn test_outbound_buffer_bounds() {
        for size in [0, MAX_OUTBOUND_BUFFER + 1] {
            let config = RealtimeConfig {
                outbound_buffer: size,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidOutboundBuffer(MAX_OUTBOUND_BUFFER))
            );
        }
    }
}
