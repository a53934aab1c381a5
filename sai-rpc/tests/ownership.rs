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

mod common;

#[cfg(test)]
mod ownership_tests {
    use sai_rpc::value::CharData;
    use sai_rpc::wire::{
        WireAclCapability, WireAclField, WireAclFieldData, WireAttribute, WireIpAddr,
        WireIpAddress, WireValue,
    };
    use sai_rpc::{
        AttrCodec, ErrorCode, NativeAttribute, NativeList, NativeValue, ObjectType, Registry,
    };

    use crate::common::{alloc_stats, init_env_logger, registry, AllocStats, Exhausted, Tracked};

    fn codec(registry: &Registry) -> AttrCodec<'_, Registry, Tracked> {
        AttrCodec::new_in(registry)
    }

    fn stats(allocated: usize, released: usize) -> AllocStats {
        AllocStats {
            allocated,
            released,
            live: allocated - released,
        }
    }

    #[test]
    fn test_list_is_released_once_after_round_trip() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let wire = WireAttribute::new(0x2e, WireValue::U32List(vec![0, 1, 2, 3]));

        let native = codec.to_native(ObjectType::PORT, &wire).unwrap();
        assert_eq!(alloc_stats(), stats(1, 0));

        let back = codec.to_wire(ObjectType::PORT, native).unwrap();
        assert_eq!(back, wire);
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_scalars_allocate_nothing() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        for wire in [
            WireAttribute::new(3, WireValue::U32(25_000)),
            WireAttribute::new(0x1f, WireValue::BoolData(false)),
        ] {
            let native = codec.to_native(ObjectType::PORT, &wire).unwrap();
            codec.to_wire(ObjectType::PORT, native).unwrap();
        }

        assert_eq!(alloc_stats(), stats(0, 0));
    }

    #[test]
    fn test_empty_list_is_allocated_and_released() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let wire = WireAttribute::new(0x02, WireValue::ObjList(vec![]));

        let native = codec.to_native(ObjectType::SWITCH, &wire).unwrap();
        assert_eq!(alloc_stats(), stats(1, 0));

        codec.to_wire(ObjectType::SWITCH, native).unwrap();
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_acl_u8_list_owns_data_and_mask() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let wire = WireAttribute::new(
            0x1006,
            WireValue::AclField(WireAclField {
                enable: true,
                data: WireAclFieldData::U8List {
                    data: vec![0x11, 0x22],
                    mask: vec![-1, -1],
                },
            }),
        );

        let native = codec.to_native(ObjectType::ACL_ENTRY, &wire).unwrap();
        assert_eq!(alloc_stats(), stats(2, 0));

        drop(native);
        assert_eq!(alloc_stats(), stats(2, 2));
    }

    #[test]
    fn test_acl_capability_owns_action_list() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let wire = WireAttribute::new(
            0x26,
            WireValue::AclCapability(WireAclCapability {
                is_action_list_mandatory: false,
                action_list: vec![1, 2, 3],
            }),
        );

        let native = codec.to_native(ObjectType::SWITCH, &wire).unwrap();
        assert_eq!(alloc_stats(), stats(1, 0));

        assert_eq!(codec.to_wire(ObjectType::SWITCH, native).unwrap(), wire);
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_failed_element_releases_list() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let wire = WireAttribute::new(
            0x28,
            WireValue::IpAddrList(vec![
                WireIpAddress {
                    addr_family: 0,
                    addr: WireIpAddr::Ip4("10.0.0.1".into()),
                },
                WireIpAddress {
                    addr_family: 0,
                    addr: WireIpAddr::Ip4("10.0.0.300".into()),
                },
            ]),
        );

        let err = codec.to_native(ObjectType::SWITCH, &wire).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidIpv4);
        assert_eq!(err.attr_id(), Some(0x28));
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_failed_batch_releases_converted_attributes() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let attrs = [
            WireAttribute::new(0x02, WireValue::ObjList(vec![1, 2])),
            WireAttribute::new(0x1c, WireValue::S32List(vec![40, 41])),
            WireAttribute::new(0x13, WireValue::Mac("00:11:22".into())),
            WireAttribute::new(0x16, WireValue::U8List(vec![1])),
        ];

        let err = codec
            .to_native_list(ObjectType::SWITCH, &attrs)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMac);
        assert_eq!(err.attr_id(), Some(0x13));

        // The attribute after the failing one is never converted
        assert_eq!(alloc_stats(), stats(2, 2));
    }

    #[test]
    fn test_failed_to_wire_batch_releases_everything() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let mut chip_name: CharData = [0; 32];
        chip_name[0] = 0xff;

        let attrs = vec![
            NativeAttribute::new(0x02, NativeValue::ObjectList(NativeList::from_slice(&[7]).unwrap())),
            NativeAttribute::new(0x1f, NativeValue::CharData(chip_name)),
            NativeAttribute::new(0x1c, NativeValue::S32List(NativeList::from_slice(&[1, 2]).unwrap())),
        ];
        assert_eq!(alloc_stats(), stats(2, 0));

        let err = codec.to_wire_list(ObjectType::SWITCH, attrs).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Utf8Fail);
        assert_eq!(err.attr_id(), Some(0x1f));
        assert_eq!(alloc_stats(), stats(2, 2));
    }

    #[test]
    fn test_mismatched_native_value_is_released() {
        init_env_logger();

        let registry = registry();
        let codec = codec(&registry);

        let attr = NativeAttribute::new(
            0x1f,
            NativeValue::U32List(NativeList::from_slice(&[1, 2, 3]).unwrap()),
        );

        let err = codec.to_wire(ObjectType::PORT, attr).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueKindMismatch);
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_raw_parts_hand_over() {
        init_env_logger();

        let list: NativeList<u16, Tracked> = NativeList::from_slice(&[80, 443]).unwrap();

        // Native code now owns the buffer
        let (ptr, count) = list.into_raw_parts();
        assert_eq!(alloc_stats(), stats(1, 0));

        let list = unsafe { NativeList::<u16, Tracked>::from_raw_parts(ptr, count) }.unwrap();
        assert_eq!(list.into_wire(), vec![80, 443]);
        assert_eq!(alloc_stats(), stats(1, 1));
    }

    #[test]
    fn test_out_of_memory() {
        init_env_logger();

        let registry = registry();
        let codec: AttrCodec<'_, Registry, Exhausted> = AttrCodec::new_in(&registry);

        for wire in [
            WireAttribute::new(0x2e, WireValue::U32List(vec![1, 2])),
            WireAttribute::new(0x2e, WireValue::U32List(vec![])),
        ] {
            let err = codec.to_native(ObjectType::PORT, &wire).unwrap_err();

            assert_eq!(err.code(), ErrorCode::NoMemory);
            assert_eq!(err.attr_id(), Some(0x2e));
        }

        // Scalars need no memory
        assert!(codec
            .to_native(ObjectType::PORT, &WireAttribute::new(3, WireValue::U32(1)))
            .is_ok());
    }
}
