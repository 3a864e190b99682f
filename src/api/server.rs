//! API Server Module
//!
//! This module implements a JSON-RPC server for transaction submission.
//! Transactions are validated against the UTXO set; accepted ones are applied
//! to the set and queued in the pending pool, which clients drain with
//! "getPendingTransactions".

use crate::{
    ConfirmationStatus, SoftConfirmation, Transaction, ValidationResult, config::Config,
    pool::TransactionPool, utxo::UtxoCache, validation::Validator,
};
use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

/// Shared application state that is accessible across all request handlers
///
/// - `validator`: Validates incoming transactions against UTXO snapshots
/// - `tx_pool`: Stores accepted transactions
/// - `utxo_cache`: The shared UTXO set, mutated only after acceptance
#[derive(Clone)]
pub struct AppState {
    validator: Arc<Validator>,
    tx_pool: Arc<TransactionPool>,
    utxo_cache: UtxoCache,
}

impl AppState {
    pub fn new(validator: Validator, tx_pool: Arc<TransactionPool>, utxo_cache: UtxoCache) -> Self {
        Self {
            validator: Arc::new(validator),
            tx_pool,
            utxo_cache,
        }
    }
}

/// The main API server struct
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server over the given UTXO set
    pub fn new(config: Config, utxo_cache: UtxoCache, tx_pool: Arc<TransactionPool>) -> Self {
        // The validator only ever reads snapshots of the shared set
        let validator = Validator::new(utxo_cache.clone(), config.validation);

        // Bundle all shared state into AppState
        let state = AppState::new(validator, tx_pool, utxo_cache);

        Self { config, state }
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server shuts down, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        // Single POST endpoint handling every JSON-RPC method
        let app = router(self.state);

        // Format the listening address from config
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        // Bind to the TCP address and start serving
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Router with the single JSON-RPC endpoint
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_rpc))
        .with_state(state)
}

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Value,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` is populated, never both.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success<T: Serialize>(id: Value, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id,
            },
            Err(e) => {
                error!("Failed to serialize RPC result: {}", e);
                Self::failure(id, INTERNAL_ERROR, "Internal error".to_string())
            }
        }
    }

    fn failure(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message }),
            id,
        }
    }
}

/// Main RPC request handler
///
/// Called for every POST to "/". Rejects anything that is not JSON-RPC 2.0,
/// then routes the request to the handler for its method.
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    // Only JSON-RPC 2.0 requests are served
    if request.jsonrpc != "2.0" {
        return Json(JsonRpcResponse::failure(
            request.id,
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", request.jsonrpc),
        ));
    }

    // Route to the appropriate handler based on the method name
    let response = match request.method.as_str() {
        "validateTransaction" => match parse_params::<Transaction>(&request) {
            Ok(tx) => handle_validate_transaction(&state, request.id, &tx).await,
            Err(response) => response,
        },
        "sendTransaction" => match parse_params::<Transaction>(&request) {
            Ok(tx) => handle_send_transaction(&state, request.id, tx).await,
            Err(response) => response,
        },
        "getPendingTransactions" => match parse_params::<PendingParams>(&request) {
            Ok(params) => handle_get_pending(&state, request.id, params).await,
            Err(response) => response,
        },
        // Return "Method not found" error for unsupported methods
        _ => JsonRpcResponse::failure(request.id, METHOD_NOT_FOUND, "Method not found".to_string()),
    };
    Json(response)
}

/// Parameters of "getPendingTransactions"
#[derive(Debug, Deserialize)]
struct PendingParams {
    max: usize,
}

/// Deserialize the request parameters, or build the invalid-params response
fn parse_params<T: DeserializeOwned>(request: &JsonRpcRequest) -> Result<T, JsonRpcResponse> {
    serde_json::from_value(request.params.clone()).map_err(|e| {
        error!("Failed to deserialize params of {}: {}", request.method, e);
        JsonRpcResponse::failure(
            request.id.clone(),
            INVALID_PARAMS,
            format!("Invalid params: {}", e),
        )
    })
}

/// Handles "validateTransaction": a dry run that never touches the UTXO set
async fn handle_validate_transaction(
    state: &AppState,
    id: Value,
    tx: &Transaction,
) -> JsonRpcResponse {
    let result: ValidationResult = state.validator.validate_transaction(tx).await;
    JsonRpcResponse::success(id, &result)
}

/// Handles "sendTransaction"
///
/// 1. Validates the transaction against a snapshot of the UTXO set
/// 2. If valid: spends its inputs, creates its outputs and queues it
/// 3. Returns a soft confirmation, accepted or rejected with the reasons
async fn handle_send_transaction(state: &AppState, id: Value, tx: Transaction) -> JsonRpcResponse {
    info!("Processing transaction {:?}", tx.id);

    // Step 1: Validate against a consistent snapshot; every failure is collected
    let result = state.validator.validate_transaction(&tx).await;

    let status = if !result.valid {
        // Step 2a: Rejected, report every error kind found
        let reason = result
            .errors
            .iter()
            .map(|e| e.kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("Transaction {:?} rejected: {}", tx.id, reason);
        ConfirmationStatus::Rejected {
            reason,
            errors: result.errors,
        }
    } else {
        // Step 2b: Valid, apply it to the shared set and queue it
        admit(state, &tx).await
    };

    // Step 3: Send the soft confirmation back to the client
    let confirmation = SoftConfirmation {
        tx_id: tx.id,
        status,
        timestamp: chrono::Utc::now().timestamp(),
    };
    JsonRpcResponse::success(id, &confirmation)
}

/// Apply a validated transaction to the UTXO set and queue it
///
/// The snapshot it was validated against may be stale by now. Applying
/// re-checks every input under the write lock, so a transaction that lost a
/// race against a concurrent spend is rejected without touching the set.
async fn admit(state: &AppState, tx: &Transaction) -> ConfirmationStatus {
    match state.utxo_cache.apply_transaction(tx).await {
        Ok(()) => {
            info!("Transaction {:?} accepted", tx.id);
            // Queue it for inclusion in the ledger
            state.tx_pool.add(tx.clone()).await;
            ConfirmationStatus::Accepted
        }
        Err(e) => {
            warn!("Transaction {:?} could not be applied: {}", tx.id, e);
            ConfirmationStatus::Rejected {
                reason: e.to_string(),
                errors: Vec::new(),
            }
        }
    }
}

/// Handles "getPendingTransactions"
///
/// Removes up to `max` accepted transactions from the front of the pending
/// pool and returns them in arrival order.
async fn handle_get_pending(state: &AppState, id: Value, params: PendingParams) -> JsonRpcResponse {
    let pending = state.tx_pool.get_pending(params.max).await;
    info!("Handing out {} pending transactions", pending.len());
    JsonRpcResponse::success(id, &pending)
}
