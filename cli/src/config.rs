// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};
use std::fs;
use std::io;

use duo_hmac_core::utils::Redact;
use duo_hmac_core::{Credential, Error, Result};
use ini::Ini;
use log::debug;

use crate::constants::*;

/// Config carries the credentials used to sign Duo API calls.
#[derive(Clone, Default)]
pub struct Config {
    /// `integration_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`DUO_IKEY`]
    /// - the `ikey` entry of the config file
    pub integration_key: Option<String>,
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`DUO_SKEY`]
    /// - the `skey` entry of the config file
    pub secret_key: Option<String>,
    /// `api_host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`DUO_API_HOST`]
    /// - the `api_host` entry of the config file
    pub api_host: Option<String>,
    /// The config file the values were read from, used in error messages.
    pub config_file: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set integration_key
    pub fn with_integration_key(mut self, integration_key: impl Into<String>) -> Self {
        self.integration_key = Some(integration_key.into());
        self
    }

    /// Set secret_key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set api_host
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    /// Load config the way the binaries do.
    ///
    /// Env values win over the config file. The file at `path`, or
    /// [`DUO_CONFIG_FILE`], or [`DEFAULT_CONFIG_FILE`] is only read when env
    /// values leave something unset.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = Self::new().from_env();
        if config.is_complete() {
            debug!("config is fully loaded from env, skip reading config file");
            return Ok(config);
        }

        let path = match path {
            Some(path) => path.to_string(),
            None => env_var(DUO_CONFIG_FILE).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
        };
        config.from_file(&path)
    }

    /// Load config from env.
    pub fn from_env(mut self) -> Self {
        if let Some(v) = env_var(DUO_IKEY) {
            self.integration_key.get_or_insert(v);
        }
        if let Some(v) = env_var(DUO_SKEY) {
            self.secret_key.get_or_insert(v);
        }
        if let Some(v) = env_var(DUO_API_HOST) {
            self.api_host.get_or_insert(v);
        }

        self
    }

    /// Load config from the ini file at `path`.
    ///
    /// A missing or empty file, or a file without a `[duo]` section, is an
    /// error. Missing entries are left unset and reported by
    /// [`Config::into_credential`].
    pub fn from_file(self, path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::config_invalid(format!(
                    "config file {path} seems to be missing or empty"
                ))
                .with_source(err))
            }
            Err(err) => {
                return Err(
                    Error::config_invalid(format!("failed to read config file {path}"))
                        .with_source(err),
                )
            }
        };

        self.from_ini_str(&content, path)
    }

    /// Load config from ini `content`; `path` only names the file in errors.
    pub fn from_ini_str(mut self, content: &str, path: &str) -> Result<Self> {
        let conf = Ini::load_from_str(content).map_err(|e| {
            Error::config_invalid(format!("failed to parse config file {path}"))
                .with_source(anyhow::Error::new(e))
        })?;

        if conf.sections().flatten().next().is_none() {
            return Err(Error::config_invalid(format!(
                "config file {path} seems to be missing or empty"
            )));
        }

        let Some(props) = conf.section(Some(DUO_SECTION)) else {
            return Err(Error::config_invalid(format!(
                "config file {path} seems to be missing a '{DUO_SECTION}' section"
            )));
        };

        if let Some(v) = props.get(IKEY_KEY) {
            self.integration_key.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = props.get(SKEY_KEY) {
            self.secret_key.get_or_insert_with(|| v.to_string());
        }
        if let Some(v) = props.get(API_HOST_KEY) {
            self.api_host.get_or_insert_with(|| v.to_string());
        }
        self.config_file = Some(path.to_string());

        Ok(self)
    }

    /// Check every value is set and turn the config into a credential.
    pub fn into_credential(self) -> Result<Credential> {
        let Config {
            integration_key,
            secret_key,
            api_host,
            config_file,
        } = self;
        let file = config_file.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let require = |value: Option<String>, key: &str| {
            value.filter(|v| !v.is_empty()).ok_or_else(|| {
                Error::config_invalid(format!(
                    "missing entry for '{key}' in {file} '{DUO_SECTION}'"
                ))
            })
        };

        Ok(Credential::new(
            require(integration_key, IKEY_KEY)?,
            require(secret_key, SKEY_KEY)?,
            require(api_host, API_HOST_KEY)?,
        ))
    }

    fn is_complete(&self) -> bool {
        [&self.integration_key, &self.secret_key, &self.api_host]
            .iter()
            .all(|v| v.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("integration_key", &self.integration_key)
            .field("secret_key", &self.secret_key.as_ref().map(Redact::from))
            .field("api_host", &self.api_host)
            .field("config_file", &self.config_file)
            .finish()
    }
}
