use clap::Parser;
use seo_lens::render::RenderedTab;
use seo_lens::{Inspector, PopupSession};

mod args;
use args::{Args, ExportArg, convert_source};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Inspecting: {}", args.target);

    let source = match convert_source(args.source, &args.target, args.url.clone()) {
        Ok(source) => source,
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(2);
        }
    };

    if let seo_lens::PageSource::WebDriver(_) = &source {
        println!("Note: WebDriver rendering requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let mut inspector = Inspector::new(source);
    if let Some(path) = &args.config {
        inspector = match inspector.with_config_file(path) {
            Ok(inspector) => inspector,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        };
    }
    if let Some(timeout) = args.timeout {
        inspector = inspector.with_page_timeout(timeout);
    }

    let mut popup = match inspector.open().await {
        Ok(popup) => popup,
        Err(e) => {
            ::log::error!("Failed to load page: {}", e);
            std::process::exit(1);
        }
    };

    let start_time = std::time::Instant::now();
    for tab in args.tab.tabs() {
        let rendered = popup.show_tab(tab).await;
        print_tab(&rendered);
        if let Some(format) = args.export {
            save_exports(&rendered, format, &args);
        }
    }

    if args.highlight {
        match popup.highlight_missing_alt(true).await {
            Ok(count) => println!("Flagged {count} images without alt text"),
            Err(e) => ::log::error!("Highlight failed: {}", e),
        }
    }

    if args.footer {
        print_footer(&popup).await;
    }

    if args.explain {
        println!("== Help ==");
        for (element_id, text) in popup.help_entries() {
            println!("{element_id}: {text}");
        }
    }

    ::log::info!(
        "Inspection complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
}

fn print_tab(tab: &RenderedTab) {
    println!("== {} ==", tab.tab.title());
    print!("{}", tab.body);
    for action in &tab.exports {
        let state = if action.is_enabled() { "" } else { " (nothing to export)" };
        ::log::debug!("Export action {}: {}{}", action.id, action.label, state);
    }
    println!();
}

fn save_exports(tab: &RenderedTab, format: ExportArg, args: &Args) {
    let downloads = tab
        .exports
        .iter()
        .filter_map(|action| action.download.as_ref())
        .filter(|d| d.mime == format.format().mime());

    for download in downloads {
        match download.write_to(&args.out_dir) {
            Ok(path) => println!("Saved {}", path.display()),
            Err(e) => ::log::error!("Failed to save {}: {}", download.filename, e),
        }
    }
}

async fn print_footer(popup: &PopupSession) {
    match popup.footer().await {
        Some(footer) => {
            println!("Robots:  {}", footer.robots_url);
            println!("Sitemap: {}", footer.sitemap_url);
        }
        None => ::log::warn!("No http(s) origin for {}, skipping footer", popup.page_url()),
    }
}
