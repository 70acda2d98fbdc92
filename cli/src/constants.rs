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

/// Config file read when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "duo.conf";
/// Section of the config file holding the credentials.
pub const DUO_SECTION: &str = "duo";

/// Integration key entry.
pub const IKEY_KEY: &str = "ikey";
/// Secret key entry.
pub const SKEY_KEY: &str = "skey";
/// API host entry.
pub const API_HOST_KEY: &str = "api_host";

// Env values used by the cli.
/// Overrides the integration key from the config file.
pub const DUO_IKEY: &str = "DUO_IKEY";
/// Overrides the secret key from the config file.
pub const DUO_SKEY: &str = "DUO_SKEY";
/// Overrides the api host from the config file.
pub const DUO_API_HOST: &str = "DUO_API_HOST";
/// Path of the config file.
pub const DUO_CONFIG_FILE: &str = "DUO_CONFIG_FILE";

/// Duo error code telling that an Auth API call was made with Admin API
/// credentials.
pub const ADMIN_CREDENTIALS_CODE: i64 = 40301;
/// Endpoint checked with Auth API credentials.
pub const AUTH_CHECK_PATH: &str = "/auth/v2/check";
/// Endpoint checked with Admin API credentials.
pub const ADMIN_SETTINGS_PATH: &str = "/admin/v1/settings";
