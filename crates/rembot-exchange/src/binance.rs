//! Binance USDⓈ-M futures integration.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rembot_config::BotSettings;
use rembot_core::error::ExchangeError;
use rembot_core::traits::ExchangeAdapter;
use rembot_core::types::{
    Candle, Interval, MarketSnapshot, Position, PositionSide, PositionStatus, TargetPrices,
    TradeOutcome,
};
use rembot_indicators::SnapshotBuilder;
use reqwest::{header, Client, Method, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::targets::TargetCalculator;

/// Production REST endpoint.
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;
const DEFAULT_KLINE_LIMIT: usize = 500;

type HmacSha256 = Hmac<Sha256>;

/// Binance API configuration.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
    pub api_key: String,
    pub secret_key: String,
    pub symbol: String,
    pub interval: Interval,
    pub leverage: u32,
    /// Compute targets only; never send signed requests
    pub test_mode: bool,
    pub recv_window_ms: u64,
    /// Klines requested per snapshot
    pub kline_limit: usize,
    pub timeout: Duration,
}

impl BinanceConfig {
    pub fn from_settings(settings: &BotSettings) -> Self {
        Self {
            base_url: BINANCE_FUTURES_URL.to_string(),
            api_key: settings.api.public_key.clone(),
            secret_key: settings.api.secret_key.clone(),
            symbol: settings.position.symbol.clone(),
            interval: settings.runtime.interval,
            leverage: settings.position.leverage,
            test_mode: settings.runtime.test_mode,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            kline_limit: DEFAULT_KLINE_LIMIT,
            timeout: settings.request_timeout(),
        }
    }

    /// Point the client at another host, e.g. the testnet.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// HMAC-SHA256 signature of `payload`, hex encoded.
pub fn sign(secret: &str, payload: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Configuration(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Join parameters into a query string. Values sent here are plain
/// symbols, numbers and enum names, none of which need escaping.
fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderAck {
    order_id: i64,
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRisk {
    symbol: String,
    position_amt: String,
    mark_price: String,
}

/// Binance USDⓈ-M futures client.
pub struct BinanceFutures {
    config: BinanceConfig,
    client: Client,
    builder: SnapshotBuilder,
    targets: TargetCalculator,
}

impl BinanceFutures {
    /// Create a new client.
    pub fn new(config: BinanceConfig, targets: TargetCalculator) -> Result<Self, ExchangeError> {
        let builder = SnapshotBuilder::new();
        if config.kline_limit < builder.warmup() {
            return Err(ExchangeError::Configuration(format!(
                "kline limit {} is below the {} candle warm-up",
                config.kline_limit,
                builder.warmup()
            )));
        }

        let mut headers = header::HeaderMap::new();
        if !config.api_key.is_empty() {
            headers.insert(
                "X-MBX-APIKEY",
                header::HeaderValue::from_str(&config.api_key)
                    .map_err(|e| ExchangeError::Configuration(e.to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        Ok(Self {
            config,
            client,
            builder,
            targets,
        })
    }

    /// Recent klines for the configured symbol and interval, oldest first.
    pub async fn get_klines(&self) -> Result<Vec<Candle>, ExchangeError> {
        let url = format!("{}/fapi/v1/klines", self.config.base_url);
        let params = [
            ("symbol", self.config.symbol.clone()),
            ("interval", self.config.interval.to_string()),
            ("limit", self.config.kline_limit.to_string()),
        ];

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        let rows: Vec<Vec<Value>> = Self::parse_response(resp).await?;
        rows.iter().map(|row| parse_kline(row)).collect()
    }

    async fn parse_response<T: DeserializeOwned>(resp: Response) -> Result<T, ExchangeError> {
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ExchangeError::Api(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| ExchangeError::Parse(e.to_string()))
    }

    /// Send a request carrying `timestamp`, `recvWindow` and a signature.
    async fn signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(&str, String)>,
    ) -> Result<T, ExchangeError> {
        params.push(("recvWindow", self.config.recv_window_ms.to_string()));
        params.push(("timestamp", Utc::now().timestamp_millis().to_string()));

        let query = query_string(&params);
        let signature = sign(&self.config.secret_key, &query)?;
        let url = format!(
            "{}{}?{}&signature={}",
            self.config.base_url, path, query, signature
        );

        debug!("{} {}", method, path);
        let resp = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        Self::parse_response(resp).await
    }

    async fn submit_order(&self, params: Vec<(&str, String)>) -> Result<OrderAck, ExchangeError> {
        self.signed(Method::POST, "/fapi/v1/order", params)
            .await
            .map_err(|e| match e {
                ExchangeError::Api(msg) => ExchangeError::OrderRejected(msg),
                other => other,
            })
    }

    /// Market entry followed by reduce-only take-profit and stop-loss orders.
    ///
    /// If a bracket leg is rejected after the entry filled, the position is
    /// closed at market and the rejection returned. When that close fails too,
    /// the targets are returned so the position is tracked as open.
    async fn open_bracket(
        &self,
        side: PositionSide,
        price: f64,
    ) -> Result<TargetPrices, ExchangeError> {
        let targets = self.targets.targets(side, price)?;

        if self.config.test_mode {
            info!(
                "Test mode: {} entry at {:.2} not sent (TP {:.2}, SL {:.2})",
                side, price, targets.take_profit, targets.stop_loss
            );
            return Ok(targets);
        }

        let quantity = self.targets.quantity(price)?;
        let (open_side, close_side) = match side {
            PositionSide::Long => ("BUY", "SELL"),
            PositionSide::Short => ("SELL", "BUY"),
        };

        let entry = self
            .submit_order(vec![
                ("symbol", self.config.symbol.clone()),
                ("side", open_side.to_string()),
                ("type", "MARKET".to_string()),
                ("quantity", quantity.to_string()),
                ("newClientOrderId", client_order_id()),
            ])
            .await?;
        info!(
            "Order submitted: {} {} {} (id {}, {})",
            open_side, quantity, self.config.symbol, entry.order_id, entry.status
        );

        if let Err(e) = self.place_brackets(close_side, &targets).await {
            warn!("Bracket order failed after {} entry filled: {}", side, e);
            return match self.flatten(close_side, quantity).await {
                Ok(()) => Err(e),
                Err(close_err) => {
                    // Still exposed: hand the position to the engine so it is tracked.
                    error!(
                        "Could not close unprotected {} position: {}",
                        side, close_err
                    );
                    Ok(targets)
                }
            };
        }

        Ok(targets)
    }

    /// Reduce-only take-profit and stop-loss legs for the open position.
    async fn place_brackets(
        &self,
        close_side: &str,
        targets: &TargetPrices,
    ) -> Result<(), ExchangeError> {
        for (order_type, stop_price) in [
            ("TAKE_PROFIT_MARKET", targets.take_profit),
            ("STOP_MARKET", targets.stop_loss),
        ] {
            let ack = self
                .submit_order(vec![
                    ("symbol", self.config.symbol.clone()),
                    ("side", close_side.to_string()),
                    ("type", order_type.to_string()),
                    ("stopPrice", self.targets.format_price(stop_price)?),
                    ("closePosition", "true".to_string()),
                    ("workingType", "MARK_PRICE".to_string()),
                    ("newClientOrderId", client_order_id()),
                ])
                .await?;
            debug!("{} placed at {} (id {})", order_type, stop_price, ack.order_id);
        }
        Ok(())
    }

    /// Close `quantity` at market and drop any bracket leg already resting.
    async fn flatten(&self, close_side: &str, quantity: Decimal) -> Result<(), ExchangeError> {
        let ack = self
            .submit_order(vec![
                ("symbol", self.config.symbol.clone()),
                ("side", close_side.to_string()),
                ("type", "MARKET".to_string()),
                ("quantity", quantity.to_string()),
                ("reduceOnly", "true".to_string()),
                ("newClientOrderId", client_order_id()),
            ])
            .await?;
        info!(
            "Position closed at market: {} {} {} (id {})",
            close_side, quantity, self.config.symbol, ack.order_id
        );

        if let Err(e) = self.cancel_open_orders().await {
            warn!("Failed to cancel leftover bracket orders: {}", e);
        }
        Ok(())
    }

    async fn cancel_open_orders(&self) -> Result<(), ExchangeError> {
        let _: Value = self
            .signed(
                Method::DELETE,
                "/fapi/v1/allOpenOrders",
                vec![("symbol", self.config.symbol.clone())],
            )
            .await?;
        Ok(())
    }
}

fn client_order_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Parse one kline row: `[open_time, open, high, low, close, volume, ...]`.
fn parse_kline(row: &[Value]) -> Result<Candle, ExchangeError> {
    if row.len() < 6 {
        return Err(ExchangeError::Parse(format!(
            "kline has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| ExchangeError::Parse(format!("bad kline open time: {}", row[0])))?;
    let field = |i: usize| -> Result<f64, ExchangeError> {
        match &row[i] {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| ExchangeError::Parse(format!("bad kline value: {}", row[i])))
    };

    Ok(Candle::new(
        open_time,
        field(1)?,
        field(2)?,
        field(3)?,
        field(4)?,
        field(5)?,
    ))
}

fn parse_number(value: &str, what: &str) -> Result<f64, ExchangeError> {
    value
        .parse()
        .map_err(|_| ExchangeError::Parse(format!("bad {}: {}", what, value)))
}

#[async_trait]
impl ExchangeAdapter for BinanceFutures {
    async fn prepare(&self) -> Result<(), ExchangeError> {
        if self.config.test_mode {
            info!("Test mode: leverage left unchanged");
            return Ok(());
        }

        let _: Value = self
            .signed(
                Method::POST,
                "/fapi/v1/leverage",
                vec![
                    ("symbol", self.config.symbol.clone()),
                    ("leverage", self.config.leverage.to_string()),
                ],
            )
            .await?;
        info!("Leverage set to {}x for {}", self.config.leverage, self.config.symbol);
        Ok(())
    }

    async fn fetch_indicators(&self) -> Result<MarketSnapshot, ExchangeError> {
        let candles = self.get_klines().await?;
        Ok(self.builder.build(&candles)?)
    }

    async fn enter_long(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.open_bracket(PositionSide::Long, price).await
    }

    async fn enter_short(&self, price: f64) -> Result<TargetPrices, ExchangeError> {
        self.open_bracket(PositionSide::Short, price).await
    }

    async fn position_status(
        &self,
        position: &Position,
        snapshot: &MarketSnapshot,
    ) -> Result<PositionStatus, ExchangeError> {
        if self.config.test_mode {
            return Ok(position.check_exit(snapshot.price));
        }

        let risks: Vec<PositionRisk> = self
            .signed(
                Method::GET,
                "/fapi/v2/positionRisk",
                vec![("symbol", self.config.symbol.clone())],
            )
            .await?;
        let risk = risks
            .iter()
            .find(|r| r.symbol == self.config.symbol)
            .ok_or_else(|| {
                ExchangeError::Parse(format!("no position risk entry for {}", self.config.symbol))
            })?;

        if parse_number(&risk.position_amt, "positionAmt")? != 0.0 {
            return Ok(PositionStatus::Open);
        }

        // One bracket leg fired; the other is still resting.
        if let Err(e) = self.cancel_open_orders().await {
            warn!("Failed to cancel leftover bracket orders: {}", e);
        }

        let mark = parse_number(&risk.mark_price, "markPrice")?;
        let targets = position.targets();
        let status = if (mark - targets.take_profit).abs() <= (mark - targets.stop_loss).abs() {
            PositionStatus::Closed {
                exit_price: targets.take_profit,
                outcome: TradeOutcome::Win,
            }
        } else {
            PositionStatus::Closed {
                exit_price: targets.stop_loss,
                outcome: TradeOutcome::Loss,
            }
        };
        Ok(status)
    }

    fn name(&self) -> &str {
        if self.config.test_mode {
            "Binance Futures (test mode)"
        } else {
            "Binance Futures"
        }
    }
}
