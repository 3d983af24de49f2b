//! Plain-text rendering of the catalog screens.

use std::fmt::Write as _;

use crate::areas::AreaOverview;
use crate::finder::GlobalFinder;
use crate::formats::Record;
use crate::lister::{ListingStats, ListingView};
use crate::session::Session;

pub fn overview(overview: &AreaOverview) -> String {
    let mut out = String::new();
    if !overview.recent_covers.is_empty() {
        out.push_str("Últimos Livros Adicionados\n");
        for cover in &overview.recent_covers {
            let _ = writeln!(out, "  {} <{}>", cover.title, cover.image);
        }
        out.push('\n');
    }
    if overview.areas.is_empty() {
        out.push_str("Nenhuma área encontrada\n");
    }
    for area in &overview.areas {
        let style = area.style();
        let _ = writeln!(
            out,
            "[{}/{}] {} ({})",
            style.color(),
            style.icon(),
            area.name,
            area.count_label()
        );
    }
    out
}

pub fn listing(area: &str, view: &ListingView<'_>, stats: ListingStats) -> String {
    let mut out = String::new();
    let items = match view {
        ListingView::NoBooks => {
            out.push_str("Nenhum livro encontrado\nAguarde novos livros clássicos\n");
            return out;
        }
        ListingView::Items(items) => items,
    };

    let _ = writeln!(
        out,
        "{area}: {} livros, {} para download",
        stats.total, stats.available_for_download
    );
    for item in items {
        let mut marks = String::new();
        if item.is_highlighted {
            marks.push('*');
        }
        if item.is_read {
            marks.push('✓');
        }
        if item.is_favorite {
            marks.push('♥');
        }
        let _ = writeln!(out, "{}", record_line(item.record, &marks));
    }
    out
}

pub fn search_panel(finder: &GlobalFinder) -> String {
    if finder.is_loading() {
        return "Pesquisando...\n".to_owned();
    }
    if !finder.is_open() {
        return String::new();
    }
    let mut out = String::new();
    for (index, hit) in finder.results().iter().enumerate() {
        let _ = writeln!(
            out,
            "{index}: {} - {} • {}",
            hit.record.title, hit.record.author, hit.area
        );
    }
    out
}

pub fn library(session: &Session) -> String {
    let mut out = String::from("Recentes\n");
    if session.recent().is_empty() {
        out.push_str("  (vazio)\n");
    }
    for record in session.recent() {
        let _ = writeln!(out, "  {}", record_line(record, ""));
    }
    out.push_str("Favoritos\n");
    let favorites = session.favorite_records();
    if favorites.is_empty() {
        out.push_str("  (vazio)\n");
    }
    for record in favorites {
        let _ = writeln!(out, "  {}", record_line(record, "♥"));
    }
    out
}

fn record_line(record: &Record, marks: &str) -> String {
    let marks = if marks.is_empty() {
        String::new()
    } else {
        format!(" {marks}")
    };
    format!("#{} {} - {}{marks}", record.id, record.title, record.author)
}
