// src/main.rs
//
// Calculette exacte: point d’entrée NATIF
// ----------------------------------------
// - journal : tracing-subscriber (RUST_LOG, défaut "info")
// - réglages : valeurs par défaut, validées avant d’ouvrir la fenêtre
// - UI      : eframe::run_native + NativeOptions

use eframe::egui;
use tracing_subscriber::EnvFilter;

use calculette_exacte::Reglages;

mod app;

use app::AppCalc;

/// Titre unique de la fenêtre.
const TITRE_APP: &str = "Calculette exacte";

fn installer_journal() {
    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtre).init();
}

fn main() -> eframe::Result<()> {
    installer_journal();

    let reglages = Reglages::default();
    if let Err(msg) = reglages.valider() {
        tracing::error!(%msg, "réglages invalides");
        std::process::exit(2);
    }
    tracing::info!(?reglages, "démarrage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([320.0, 460.0])
            .with_min_inner_size([300.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |_cc| Ok(Box::new(AppCalc::avec_reglages(reglages)))),
    )
}
