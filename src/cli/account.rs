use clap::Parser;

use crate::{cli::api::ApiArgs, prelude::*, session::UserPatch};

#[derive(Parser)]
pub struct LoginArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(long, env = "ENERTRACK_EMAIL")]
    email: String,

    #[clap(long, env = "ENERTRACK_PASSWORD", hide_env_values = true)]
    password: String,

    /// Ask the backend for a short-lived session.
    #[clap(long)]
    forget_me: bool,
}

impl LoginArgs {
    pub async fn run(self) -> Result {
        let client = self.api.new_client()?;
        let message = client.login(&self.email, &self.password, !self.forget_me).await?;
        println!("{message}");
        Ok(())
    }
}

#[derive(Parser)]
pub struct RegisterArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(long)]
    username: String,

    #[clap(long)]
    email: String,

    #[clap(long, env = "ENERTRACK_PASSWORD", hide_env_values = true)]
    password: String,
}

impl RegisterArgs {
    pub async fn run(self) -> Result {
        ensure!(!self.username.trim().is_empty(), "username is required");
        ensure!(self.email.contains('@'), "`{}` is not a valid email", self.email);
        let client = self.api.new_client()?;
        let message = client.register(&self.username, &self.email, &self.password).await?;
        println!("{message}");
        Ok(())
    }
}

#[derive(Parser)]
pub struct LogoutArgs {
    #[clap(flatten)]
    api: ApiArgs,
}

impl LogoutArgs {
    pub fn run(self) -> Result {
        self.api.new_client()?.logout()?;
        println!("Logout successful!");
        Ok(())
    }
}

#[derive(Parser)]
pub struct WhoamiArgs {
    #[clap(flatten)]
    api: ApiArgs,

    /// Verify the session with the backend first.
    #[clap(long)]
    check: bool,
}

impl WhoamiArgs {
    pub async fn run(self) -> Result {
        let client = self.api.new_client()?;
        if self.check && !client.check_session().await? {
            bail!("not signed in, run `enertrack login` first");
        }
        let user = client.session().user().context("not signed in, run `enertrack login` first")?;
        println!("User ID:  {}", user.uid);
        println!("Email:    {}", user.email.as_deref().unwrap_or("-"));
        println!("Username: {}", user.username.as_deref().unwrap_or("-"));
        if let Some(image) = &user.image {
            println!("Image:    {image}");
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct ProfileArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(long)]
    email: Option<String>,

    #[clap(long)]
    username: Option<String>,

    /// Profile image URL.
    #[clap(long)]
    image: Option<String>,
}

impl ProfileArgs {
    pub async fn run(self) -> Result {
        let patch = UserPatch { email: self.email, username: self.username, image: self.image };
        ensure!(!patch.is_empty(), "nothing to update");
        let user = self.api.new_client()?.update_profile(&patch).await?;
        println!("Profile updated: {}", user.username.as_deref().unwrap_or(&user.uid));
        Ok(())
    }
}
