use clap::Parser;
use secret_santa::adapters::build_notifier;
use secret_santa::core::gate::check_environment;
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::mask::Pseudonymizer;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{
    CliConfig, Delivery, Environment, LocalStorage, OpenAiClient, Result, RunSummary,
    SantaConfig, SantaEngine, SantaError, SantaPipeline,
};

async fn run(cli: &CliConfig) -> Result<RunSummary> {
    // 載入並驗證配置
    tracing::info!("📁 Loading participants from: {}", cli.config);
    let mut config = SantaConfig::from_file(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    tracing::info!(
        "✅ Loaded {} participants ({} delivery)",
        config.participants().len(),
        if cli.dry_run { "dry-run" } else { "live" }
    );

    let mode = cli.run_mode();
    let provider = config.delivery.provider;

    // 檢查必要的環境變數，一次列出所有缺少的
    let env = Environment::load();
    check_environment(&env, mode, provider)?;

    let masker = Pseudonymizer::from_key(env.mask_key());
    if masker.is_enabled() {
        tracing::info!("🕶️ Participant names are masked in logs");
    }

    let openai = OpenAiClient::new(
        env.openai()?,
        config.generation.clone(),
        config.event.clone(),
    )?;

    // 依模式選擇寄送方式，整個執行過程不再改變
    let delivery = if mode.dry_run {
        tracing::info!("🔍 DRY RUN MODE - writing artifacts to {}", config.output.dir);
        Delivery::dry_run(LocalStorage::new(&config.output.dir), mode.skip_images)
    } else {
        Delivery::live(build_notifier(provider, &env, &config.event)?)
    };

    let pipeline = SantaPipeline::new(openai.clone(), openai, delivery, mode)
        .with_delay(config.delay())
        .with_masker(masker);

    // 創建引擎並運行
    SantaEngine::new(pipeline).run(config.participants()).await
}

fn exit_code(e: &SantaError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,   // 外部服務錯誤
        ErrorSeverity::High => 1,     // 配置或輸入錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    tracing::info!("🎄 Starting secret-santa");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(summary) => {
            println!("✅ Secret Santa complete: {} assignment(s), {}", summary.delivered, summary.mode);
            if !summary.artifacts.is_empty() {
                println!("📁 {} artifact(s) written:", summary.artifacts.len());
                for path in &summary.artifacts {
                    println!("   {}", path);
                }
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}
