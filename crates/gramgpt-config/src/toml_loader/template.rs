//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# GramGPT Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The API key is never stored here: set GEMINI_API_KEY (or GOOGLE_API_KEY)
# in the environment or in a .env file.

[model]
# name = "gemini-2.5-flash"
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# temperature = 0.7            # 0.0-2.0
# top_k = 40                   # 1-100
# top_p = 0.95                 # 0.0-1.0
# max_output_tokens = 2048     # 1-65536
# summary_temperature = 0.5    # 0.0-2.0
# suggestion_temperature = 0.8 # 0.0-2.0
# connect_timeout_secs = 10    # 1-60
# request_timeout_secs = 120   # 5-600

[chat]
# language = "en-IN"     # en-IN, hi-IN, bn-IN, mr-IN, ta-IN, te-IN, gu-IN

[proxy]
# bind = "0.0.0.0"
# port = 3000            # 1-65535
# static_dir = "public"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
