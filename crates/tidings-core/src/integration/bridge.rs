//! Untyped marshaling boundary.
//!
//! The [`ScriptBridge`] accepts broadcasts from callers that only hold a
//! channel value plus an untyped payload/descriptor pair, validates them, and
//! forwards them into [`Bus::broadcast_dyn`]. A call that fails validation is
//! logged, counted as rejected, and not forwarded at all.
//!
//! ```text
//! script ──(channel, descriptor, payload)──▶ ScriptBridge ──▶ Bus::broadcast_dyn
//!                                                 │
//!                                                 └─ rejected: logged, nothing sent
//! ```

use tracing::error;

use super::catalog::PayloadCatalog;
use crate::foundation::{BridgeError, BridgeResult, Channel, Message, PayloadType};
use crate::framework::Bus;

/// Validating entry point for untyped broadcasts.
#[derive(Debug, Clone)]
pub struct ScriptBridge {
    bus: Bus,
    catalog: PayloadCatalog,
}

impl ScriptBridge {
    /// Creates a bridge forwarding into `bus`, decoding by name through `catalog`.
    pub fn new(bus: Bus, catalog: PayloadCatalog) -> Self {
        Self { bus, catalog }
    }

    /// The bus broadcasts are forwarded to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The catalog used by [`broadcast_json`](Self::broadcast_json).
    pub fn catalog(&self) -> &PayloadCatalog {
        &self.catalog
    }

    /// Broadcasts a payload accompanied by a caller-supplied type descriptor.
    ///
    /// Rejects the call if either half is missing or if the descriptor does
    /// not describe the payload's concrete type.
    pub fn broadcast_erased(
        &self,
        channel: &Channel,
        descriptor: Option<PayloadType>,
        payload: Option<&dyn Message>,
    ) -> BridgeResult<()> {
        let descriptor = descriptor.ok_or(BridgeError::MissingDescriptor);
        let checked = descriptor.and_then(|descriptor| {
            let payload = payload.ok_or(BridgeError::MissingPayload { descriptor })?;
            let actual = payload.payload_type();
            if actual != descriptor {
                return Err(BridgeError::DescriptorMismatch { descriptor, actual });
            }
            Ok(payload)
        });

        match checked {
            Ok(payload) => {
                self.bus.broadcast_dyn(channel, payload);
                Ok(())
            }
            Err(err) => Err(self.reject(channel.as_str(), err)),
        }
    }

    /// Decodes a JSON body as the named payload type and broadcasts it.
    ///
    /// ```rust,ignore
    /// bridge.broadcast_json("Game.Damage", "Damage", json!({ "amount": 5 }))?;
    /// ```
    pub fn broadcast_json(
        &self,
        channel: &str,
        type_name: &str,
        body: serde_json::Value,
    ) -> BridgeResult<()> {
        let decoded = Channel::new(channel)
            .map_err(BridgeError::from)
            .and_then(|channel| Ok((channel, self.catalog.decode(type_name, body)?)));

        match decoded {
            Ok((channel, payload)) => {
                self.bus.broadcast_dyn(&channel, payload.as_ref());
                Ok(())
            }
            Err(err) => Err(self.reject(channel, err)),
        }
    }

    fn reject(&self, channel: &str, err: BridgeError) -> BridgeError {
        error!(
            session = %self.bus.config().session_name,
            channel,
            error = %err,
            "Invalid broadcast from marshaling boundary"
        );
        self.bus.record_rejected();
        err
    }
}
