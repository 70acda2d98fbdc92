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

use crate::utils::Redact;

/// Credential for a Duo application.
#[derive(Clone)]
pub struct Credential {
    /// Integration key, sent in plaintext as part of the Authorization header.
    pub integration_key: String,
    /// Secret key used as the HMAC key. Never logged.
    pub secret_key: String,
    /// API hostname, e.g. `api-xxxxxxxx.duosecurity.com`.
    pub api_host: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(
        integration_key: impl Into<String>,
        secret_key: impl Into<String>,
        api_host: impl Into<String>,
    ) -> Self {
        Self {
            integration_key: integration_key.into(),
            secret_key: secret_key.into(),
            api_host: api_host.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("integration_key", &self.integration_key)
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("api_host", &self.api_host)
            .finish()
    }
}
