use chat_engine::{format_news, ChatEngine};
use ml_client::{MlClient, MlConfig};
use news_gateway::NewsGateway;
use portfolio_store::Store;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatAction, utils::command::BotCommands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_model::TrendAnalyzer;

const NEWS_DAYS: i64 = 1;

const WELCOME_TEXT: &str = "🤖 Fintelli'ye hoş geldiniz!\n\n\
Ben sizin finansal asistanınızım. Size yardımcı olabileceğim konular:\n\n\
📊 Piyasa Analizi\n📈 Yatırım Tavsiyeleri\n📰 Finansal Haberler\n💼 Portföy Takibi\n\n\
Nasıl yardımcı olabilirim?\n\n/help komutu ile tüm komutları görebilirsiniz.";

const HELP_TEXT: &str = "🔍 Kullanılabilir Komutlar:\n\n\
/analiz [sembol] - Bir hisse veya kripto için analiz\n\
/portfoy - Portföyünüzün durumu\n\
/haberler [sembol] - İlgili haberleri göster\n\n\
Ayrıca benimle doğal dilde konuşabilirsiniz!\n\
Örnek: \"Bitcoin'in durumu nasıl?\" veya \"THYAO hakkında ne düşünüyorsun?\"";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    Start,
    Help,
    Analiz(String),
    Portfoy,
    Haberler(String),
}

/// Injected service stack shared by every handler
#[derive(Clone)]
struct Services {
    chat: ChatEngine,
    news: NewsGateway,
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Services,
) -> ResponseResult<()> {
    // Private-chat id doubles as the Telegram user id
    let user_id = msg.chat.id.0;

    let response = match cmd {
        Command::Start => WELCOME_TEXT.to_string(),
        Command::Help => HELP_TEXT.to_string(),
        Command::Analiz(arg) => {
            let symbol = arg.trim();
            if symbol.is_empty() {
                "Lütfen analiz yapmak istediğiniz sembolü girin.\nÖrnek: /analiz THYAO"
                    .to_string()
            } else {
                let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
                services
                    .chat
                    .handle_market_analysis(&format!("analiz {}", symbol.to_uppercase()))
                    .await
            }
        }
        Command::Portfoy => {
            let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
            services
                .chat
                .handle_portfolio_advice(user_id, "portföy durumu")
                .await
        }
        Command::Haberler(arg) => {
            let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
            let symbol = {
                let trimmed = arg.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_uppercase())
                }
            };
            let items = services.news.fetch_news(symbol.as_deref(), NEWS_DAYS).await;
            format_news(symbol.as_deref(), &items)
        }
    };

    bot.send_message(msg.chat.id, response).await?;
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, services: Services) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let user_id = msg.chat.id.0;
    let response = services.chat.respond(user_id, text, &[]).await;

    bot.send_message(msg.chat.id, response).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "telegram_bot=info".into());

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

    let token = std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:fintelli.db".to_string());
    let news_api_key = std::env::var("NEWS_API_KEY").unwrap_or_default();

    let store = Store::connect(&database_url).await?;
    let ml = MlClient::new(MlConfig::default());
    let news = NewsGateway::new(news_api_key, ml.sentiment.clone());
    let trend = TrendAnalyzer::new(Arc::new(ml.price_predictor.clone()));
    let chat = ChatEngine::new(store, trend, news.clone(), Arc::new(ml.chat.clone()));

    let services = Services { chat, news };

    let bot = Bot::new(token);

    tracing::info!("Telegram bot starting...");

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::endpoint(handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Telegram bot shut down.");

    Ok(())
}
