mod embeds;

use chat_engine::ChatEngine;
use ml_client::{MlClient, MlConfig};
use news_gateway::NewsGateway;
use portfolio_store::Store;
use serenity::{
    async_trait,
    builder::CreateMessage,
    model::{channel::Message, gateway::Ready},
    prelude::*,
};
use std::sync::Arc;
use tokio::signal::unix::SignalKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_model::TrendAnalyzer;

const NEWS_DAYS: i64 = 1;

const HELP_TEXT: &str = "🔍 Kullanılabilir Komutlar:\n\n\
!analiz [sembol] - Bir hisse veya kripto için analiz\n\
!portfoy - Portföyünüzün durumu\n\
!haberler [sembol] - İlgili haberleri göster\n\n\
Ayrıca DM üzerinden benimle doğal dilde konuşabilirsiniz!";

struct Handler {
    chat: ChatEngine,
    news: NewsGateway,
}

impl Handler {
    async fn handle_analyze(&self, ctx: &Context, msg: &Message, symbol: Option<&str>) {
        let Some(symbol) = symbol.map(str::to_uppercase) else {
            let _ = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Lütfen analiz yapmak istediğiniz sembolü girin.\nÖrnek: !analiz THYAO",
                )
                .await;
            return;
        };

        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

        let body = self
            .chat
            .handle_market_analysis(&format!("analiz {}", symbol))
            .await;

        let builder = CreateMessage::new().embed(embeds::analysis_embed(&symbol, &body));
        if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
            tracing::error!("Failed to send analysis embed: {}", e);
            let _ = msg
                .channel_id
                .say(&ctx.http, "Analiz yapılırken bir hata oluştu. Lütfen tekrar deneyin.")
                .await;
        }
    }

    async fn handle_portfolio(&self, ctx: &Context, msg: &Message) {
        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

        let user_id = msg.author.id.get() as i64;
        let body = self
            .chat
            .handle_portfolio_advice(user_id, "portföy durumu")
            .await;

        let builder = CreateMessage::new().embed(embeds::portfolio_embed(&body));
        if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
            tracing::error!("Failed to send portfolio embed: {}", e);
            let _ = msg
                .channel_id
                .say(&ctx.http, "Portföy bilgileri alınırken bir hata oluştu.")
                .await;
        }
    }

    async fn handle_news(&self, ctx: &Context, msg: &Message, symbol: Option<&str>) {
        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

        let symbol = symbol.map(str::to_uppercase);
        let items = self.news.fetch_news(symbol.as_deref(), NEWS_DAYS).await;

        if items.is_empty() {
            let _ = msg.channel_id.say(&ctx.http, "Haber bulunamadı.").await;
            return;
        }

        let builder = CreateMessage::new().embed(embeds::news_embed(symbol.as_deref(), &items));
        if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
            tracing::error!("Failed to send news embed: {}", e);
            let _ = msg
                .channel_id
                .say(&ctx.http, "Haberler alınırken bir hata oluştu.")
                .await;
        }
    }

    async fn handle_free_text(&self, ctx: &Context, msg: &Message) {
        let _ = msg.channel_id.broadcast_typing(&ctx.http).await;

        let user_id = msg.author.id.get() as i64;
        let response = self.chat.respond(user_id, &msg.content, &[]).await;

        if let Err(e) = msg.reply(&ctx.http, response).await {
            tracing::error!("Failed to reply to DM: {}", e);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Some(rest) = msg.content.strip_prefix('!') {
            let mut parts = rest.split_whitespace();
            let command = parts.next().unwrap_or_default();
            let argument = parts.next();

            match command {
                "analiz" => self.handle_analyze(&ctx, &msg, argument).await,
                "portfoy" => self.handle_portfolio(&ctx, &msg).await,
                "haberler" => self.handle_news(&ctx, &msg, argument).await,
                "help" => {
                    let _ = msg.channel_id.say(&ctx.http, HELP_TEXT).await;
                }
                _ => {}
            }
            return;
        }

        // Free text is only answered in DMs to avoid replying to every
        // guild message
        if msg.guild_id.is_none() {
            self.handle_free_text(&ctx, &msg).await;
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!("{} is connected and ready!", ready.user.name);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "discord_bot=info".into());

    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let discord_token =
        std::env::var("DISCORD_BOT_TOKEN").expect("DISCORD_BOT_TOKEN must be set");
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:fintelli.db".to_string());
    let news_api_key = std::env::var("NEWS_API_KEY").unwrap_or_default();

    let store = Store::connect(&database_url).await?;
    let ml = MlClient::new(MlConfig::default());
    let news = NewsGateway::new(news_api_key, ml.sentiment.clone());
    let trend = TrendAnalyzer::new(Arc::new(ml.price_predictor.clone()));
    let chat = ChatEngine::new(
        store,
        trend,
        news.clone(),
        Arc::new(ml.chat.clone()),
    );

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler { chat, news };

    let mut client = Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Discord bot starting...");

    // Graceful shutdown: SIGINT + SIGTERM
    let shard_manager = client.shard_manager.clone();
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;

    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                tracing::error!("Discord client error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT — shutting down Discord bot...");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM — shutting down Discord bot...");
        }
    }

    shard_manager.shutdown_all().await;
    tracing::info!("Discord bot shut down.");

    Ok(())
}
