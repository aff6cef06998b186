use pfp_client::{FlagId, PfpClient};

fn should_run_live() -> bool {
    matches!(std::env::var("LIVE_API_TESTS").as_deref(), Ok("1"))
}

#[ignore]
#[tokio::test]
async fn live_flags_and_icon() -> anyhow::Result<()> {
    if !should_run_live() {
        eprintln!("skipping live test: LIVE_API_TESTS!=1");
        return Ok(());
    }
    let client = PfpClient::new()?;
    let flags = client.get_flags().await?;
    assert!(flags.contains_key(&FlagId::Pride));
    let icon = client.get_flag_icon(FlagId::Pride).await?;
    assert!(!icon.is_empty());
    Ok(())
}
