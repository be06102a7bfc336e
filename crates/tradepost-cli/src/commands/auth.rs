use anyhow::Result;

use crate::bootstrap::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let identity = app.auth().login(email, password).await?;
    println!("✅ Logged in as {} (user #{})", identity.username, identity.user_id);
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.auth().logout()?;
    println!("👋 Logged out");
    Ok(())
}

pub async fn whoami(app: &App, refresh: bool) -> Result<()> {
    let identity = if refresh {
        let token = app.require_token()?;
        Some(app.auth().refresh_identity(&token).await?)
    } else {
        app.session.identity()
    };

    match identity {
        Some(identity) => {
            println!("{} (user #{})", identity.username, identity.user_id);
            if let Some(email) = identity.email {
                println!("  email: {}", email);
            }
        }
        None if app.session.is_authenticated() => {
            println!("Logged in, but no profile is stored. Try `tradepost whoami --refresh`.")
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
