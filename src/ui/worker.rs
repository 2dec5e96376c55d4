use crate::api::{RestClient, SymbolMatch};
use crate::models::OptionsData;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Work the viewer asks of the fetch worker. `generation` is echoed back so
/// the viewer can drop responses it no longer wants.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Quote {
        symbol: String,
        generation: u64,
    },
    Chain {
        symbol: String,
        current_price: f64,
        generation: u64,
    },
    Search {
        keywords: String,
    },
}

#[derive(Debug, Clone)]
pub enum FetchEvent {
    Quote {
        symbol: String,
        generation: u64,
        price: Option<f64>,
    },
    Chain {
        symbol: String,
        generation: u64,
        data: Option<OptionsData>,
    },
    Search {
        keywords: String,
        matches: Vec<SymbolMatch>,
    },
}

async fn handle(client: &RestClient, request: FetchRequest) -> FetchEvent {
    match request {
        FetchRequest::Quote { symbol, generation } => {
            let price = client.get_quote(&symbol).await.unwrap_or_else(|e| {
                warn!("Error fetching quote for {}: {}", symbol, e);
                None
            });
            FetchEvent::Quote {
                symbol,
                generation,
                price,
            }
        }
        FetchRequest::Chain {
            symbol,
            current_price,
            generation,
        } => {
            let data = match client.get_option_chain(&symbol, current_price).await {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!("Error fetching option chain for {}: {}", symbol, e);
                    None
                }
            };
            FetchEvent::Chain {
                symbol,
                generation,
                data,
            }
        }
        FetchRequest::Search { keywords } => {
            let matches = client.search_symbols(&keywords).await.unwrap_or_else(|e| {
                warn!("Error searching symbols for '{}': {}", keywords, e);
                Vec::new()
            });
            FetchEvent::Search { keywords, matches }
        }
    }
}

/// Serve requests until the request channel closes. Each request runs on its
/// own task; the client's rate limiter paces them.
pub fn spawn_fetch_worker(
    client: RestClient,
    mut requests: mpsc::Receiver<FetchRequest>,
    events: mpsc::Sender<FetchEvent>,
) -> JoinHandle<()> {
    let client = Arc::new(client);
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            info!("Received request {:?}", request);
            let client = Arc::clone(&client);
            let events = events.clone();
            tokio::spawn(async move {
                let event = handle(&client, request).await;
                if events.send(event).await.is_err() {
                    warn!("Viewer closed before a fetch completed");
                }
            });
        }
        info!("Fetch worker stopped");
    })
}
