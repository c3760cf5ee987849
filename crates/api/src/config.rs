/// Server configuration loaded from environment variables.
///
/// All fields except the hosted-backend credentials have defaults suitable
/// for local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins for the editor, parsed from comma-separated
    /// `CORS_ORIGINS`. Public and embed routes allow any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Absolute URL this server is reachable at; used in the embed script
    /// and in links on rendered kit pages.
    pub public_base_url: String,
    /// Largest accepted request body for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Shared secret for billing webhook signatures.
    pub billing_webhook_secret: String,
    /// Hosted backend (auth, storage) settings.
    pub supabase: SupabaseConfig,
}

/// Default upload body limit: the largest per-file limit of any plan plus
/// room for the multipart envelope.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 101 * 1024 * 1024;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:3000`    |
    /// | `MAX_UPLOAD_BYTES`       | `105906176` (101 MiB)      |
    /// | `BILLING_WEBHOOK_SECRET` | **required**               |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or missing secrets; misconfiguration
    /// should stop the server at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let billing_webhook_secret = required("BILLING_WEBHOOK_SECRET");

        let supabase = SupabaseConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            max_upload_bytes,
            billing_webhook_secret,
            supabase,
        }
    }
}

/// Connection settings for the hosted backend that provides auth and
/// object storage.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Public anon key, sent as `apikey` on storage requests.
    pub anon_key: String,
    /// Service-role key used for server-side storage writes.
    pub service_role_key: String,
    /// HS256 secret the hosted auth service signs access tokens with.
    pub jwt_secret: String,
    /// Storage bucket holding kit files (default: `kit-assets`).
    pub storage_bucket: String,
}

impl SupabaseConfig {
    /// Load hosted-backend settings.
    ///
    /// | Env Var                     | Required | Default      |
    /// |-----------------------------|----------|--------------|
    /// | `SUPABASE_URL`              | **yes**  | --           |
    /// | `SUPABASE_ANON_KEY`         | **yes**  | --           |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | **yes**  | --           |
    /// | `SUPABASE_JWT_SECRET`       | **yes**  | --           |
    /// | `STORAGE_BUCKET`            | no       | `kit-assets` |
    pub fn from_env() -> Self {
        Self {
            url: required("SUPABASE_URL").trim_end_matches('/').to_string(),
            anon_key: required("SUPABASE_ANON_KEY"),
            service_role_key: required("SUPABASE_SERVICE_ROLE_KEY"),
            jwt_secret: required("SUPABASE_JWT_SECRET"),
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "kit-assets".into()),
        }
    }
}

fn required(name: &str) -> String {
    let value =
        std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}
