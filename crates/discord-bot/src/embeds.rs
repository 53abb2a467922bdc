use advisor_core::NewsItem;
use serenity::builder::{CreateEmbed, CreateEmbedFooter};

const COLOR_BLUE: u32 = 0x3498DB;
const COLOR_GREEN: u32 = 0x2ECC71;

const MAX_NEWS_FIELDS: usize = 5;
const SNIPPET_CHARS: usize = 100;

fn footer() -> CreateEmbedFooter {
    CreateEmbedFooter::new("Fintelli AI | Finansal Asistanınız")
}

pub fn analysis_embed(symbol: &str, body: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("{} Analizi", symbol))
        .description(body.to_string())
        .color(COLOR_BLUE)
        .footer(footer())
}

pub fn portfolio_embed(body: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Portföy Durumu")
        .description(body.to_string())
        .color(COLOR_GREEN)
        .footer(footer())
}

pub fn news_embed(symbol: Option<&str>, items: &[NewsItem]) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(match symbol {
            Some(sym) => format!("{} Haberleri", sym),
            None => "Genel Piyasa Haberleri".to_string(),
        })
        .color(COLOR_BLUE)
        .footer(footer());

    for item in items.iter().take(MAX_NEWS_FIELDS) {
        let summary = item.description.as_deref().unwrap_or("");
        let snippet: String = summary.chars().take(SNIPPET_CHARS).collect();
        embed = embed.field(
            format!("{} [{}]", item.title, item.sentiment.label.as_str()),
            format!("{}...\n[Devamını Oku]({})", snippet, item.url),
            false,
        );
    }

    embed
}
