/*
 *
 *    Copyright (c) 2024 SAI RPC Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! QoS map records.

use crate::config::CodecConfig;
use crate::error::Error;
use crate::wire::{WireConvert, WireQosMap, WireQosMapParams};

/// `sai_packet_color_t`
///
/// Open-ended: values outside the known colors are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PacketColor(pub i32);

impl PacketColor {
    pub const GREEN: Self = Self(0);
    pub const YELLOW: Self = Self(1);
    pub const RED: Self = Self(2);
}

/// `sai_qos_map_params_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct QosMapParams {
    pub tc: u8,
    pub dscp: u8,
    pub dot1p: u8,
    pub prio: u8,
    pub pg: u8,
    pub queue_index: u8,
    pub color: PacketColor,
    pub mpls_exp: u8,
}

impl WireConvert for QosMapParams {
    type Wire = WireQosMapParams;

    fn from_wire(wire: &WireQosMapParams, _config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            tc: wire.tc as u8,
            dscp: wire.dscp as u8,
            dot1p: wire.dot1p as u8,
            prio: wire.prio as u8,
            pg: wire.pg as u8,
            queue_index: wire.queue_index as u8,
            color: PacketColor(wire.color),
            mpls_exp: wire.mpls_exp as u8,
        })
    }

    fn to_wire(&self) -> WireQosMapParams {
        WireQosMapParams {
            tc: self.tc as i8,
            dscp: self.dscp as i8,
            dot1p: self.dot1p as i8,
            prio: self.prio as i8,
            pg: self.pg as i8,
            queue_index: self.queue_index as i8,
            color: self.color.0,
            mpls_exp: self.mpls_exp as i8,
        }
    }
}

/// `sai_qos_map_t`: one key-to-value mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct QosMap {
    pub key: QosMapParams,
    pub value: QosMapParams,
}

impl WireConvert for QosMap {
    type Wire = WireQosMap;

    fn from_wire(wire: &WireQosMap, config: &CodecConfig) -> Result<Self, Error> {
        Ok(Self {
            key: QosMapParams::from_wire(&wire.key, config)?,
            value: QosMapParams::from_wire(&wire.value, config)?,
        })
    }

    fn to_wire(&self) -> WireQosMap {
        WireQosMap {
            key: self.key.to_wire(),
            value: self.value.to_wire(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_are_copied() {
        let wire = WireQosMap {
            key: WireQosMapParams {
                tc: 1,
                dscp: 2,
                dot1p: 3,
                prio: 4,
                pg: 5,
                queue_index: 6,
                color: 2,
                mpls_exp: 7,
            },
            value: WireQosMapParams {
                tc: -1,
                dscp: 63,
                dot1p: 7,
                prio: 8,
                pg: 9,
                queue_index: 10,
                color: 1,
                mpls_exp: -128,
            },
        };

        let map = QosMap::from_wire(&wire, &CodecConfig::new()).unwrap();

        assert_eq!(map.key.queue_index, 6);
        assert_eq!(map.key.color, PacketColor::RED);
        assert_eq!(map.value.tc, 255);
        assert_eq!(map.value.color, PacketColor::YELLOW);
        assert_eq!(map.value.mpls_exp, 128);

        assert_eq!(map.to_wire(), wire);
    }

    #[test]
    fn test_unknown_color_is_kept() {
        let wire = WireQosMapParams {
            color: 42,
            ..Default::default()
        };

        let params = QosMapParams::from_wire(&wire, &CodecConfig::new()).unwrap();
        assert_eq!(params.color, PacketColor(42));
        assert_eq!(params.to_wire().color, 42);
    }
}
