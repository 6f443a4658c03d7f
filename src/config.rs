use clap::Parser;

/// 서버 설정. 명령행 인자 또는 환경 변수로 지정한다.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fraud-auction-service",
    about = "In-memory auction service with real-time bid fraud alerts"
)]
pub struct ServerConfig {
    #[arg(
        long = "http.addr",
        default_value = "0.0.0.0",
        value_name = "ADDRESS",
        help = "Listening address for the http server.",
        env = "AUCTION_HTTP_ADDR"
    )]
    pub http_addr: String,
    #[arg(
        long,
        default_value_t = 3000,
        value_name = "PORT",
        help = "Listening port for the http server.",
        env = "PORT"
    )]
    pub port: u16,
    #[arg(
        long = "no-seed",
        default_value_t = false,
        help = "Start with an empty store instead of the demo users and auctions.",
        env = "AUCTION_NO_SEED"
    )]
    pub no_seed: bool,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_addr, self.port)
    }
}
