use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Shortest abbreviation accepted by [`Database::read`]
const MIN_PREFIX_LENGTH: usize = 2;

/// Loose object store rooted at `.git/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Digest a payload as if it were stored, without touching the disk
    pub fn hash(&self, object_type: ObjectType, payload: &[u8]) -> ObjectId {
        ObjectId::digest(&frame(object_type, payload))
    }

    /// Persist a payload under its digest
    ///
    /// Writing an object that already exists is a no-op.
    #[instrument(skip(self, payload), fields(size = payload.len()))]
    pub fn write(&self, object_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let content = frame(object_type, payload);
        let object_id = ObjectId::digest(&content);
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            trace!(%object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::InvalidPath(object_path.display().to_string()))?;
        std::fs::create_dir_all(object_dir)?;

        self.write_object(object_dir, &object_path, &content)?;
        debug!(%object_id, "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.write(object.object_type(), &object.serialize()?)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read an object from its full digest or an unambiguous hex prefix
    #[instrument(skip(self))]
    pub fn read(&self, name: &str) -> Result<(ObjectType, Bytes)> {
        let prefix = name.to_ascii_lowercase();
        let valid = (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&prefix.len())
            && prefix.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(Error::InvalidObjectId(name.to_string()));
        }

        let mut matches = self.find_objects_by_prefix(&prefix)?;
        match matches.len() {
            0 => Err(Error::NotFound(name.to_string())),
            1 => {
                let object_id = matches.remove(0);
                self.load(&object_id)
            }
            _ => Err(Error::AmbiguousReference {
                name: name.to_string(),
                candidates: matches.iter().map(ObjectId::to_string).collect(),
            }),
        }
    }

    /// Read an object by its exact digest
    pub fn load(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(object_id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        let content = Self::decompress(&compressed)
            .map_err(|_| Error::CorruptObject(format!("{object_id}: invalid zlib stream")))?;

        Self::split_header(object_id, content)
    }

    pub fn object_type(&self, object_id: &ObjectId) -> Result<ObjectType> {
        Ok(self.load(object_id)?.0)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, payload) = self.load(object_id)?;

        ObjectBox::parse(object_type, payload)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> Result<Option<Blob>> {
        self.parse_object_as(object_id, ObjectType::Blob)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        self.parse_object_as(object_id, ObjectType::Tree)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        self.parse_object_as(object_id, ObjectType::Commit)
    }

    pub fn parse_object_as_tag(&self, object_id: &ObjectId) -> Result<Option<Tag>> {
        self.parse_object_as(object_id, ObjectType::Tag)
    }

    fn parse_object_as<T: Unpackable>(
        &self,
        object_id: &ObjectId,
        expected: ObjectType,
    ) -> Result<Option<T>> {
        let (object_type, payload) = self.load(object_id)?;

        if object_type != expected {
            return Ok(None);
        }
        Ok(Some(T::deserialize(payload)?))
    }

    /// Find all objects whose OID starts with the given prefix
    ///
    /// The prefix needs at least the two characters naming its fan-out
    /// directory, which is the only directory searched. Results are sorted.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if prefix.len() < MIN_PREFIX_LENGTH || !prefix.is_char_boundary(MIN_PREFIX_LENGTH) {
            return Err(Error::InvalidObjectId(prefix.to_string()));
        }

        let mut matches = Vec::new();
        let (dir_name, file_prefix) = prefix.split_at(MIN_PREFIX_LENGTH);
        self.scan_fan_out(
            dir_name,
            |file_name| file_name.starts_with(file_prefix),
            &mut matches,
        )?;

        matches.sort();
        Ok(matches)
    }

    fn scan_fan_out(
        &self,
        dir_name: &str,
        accept: impl Fn(&str) -> bool,
        matches: &mut Vec<ObjectId>,
    ) -> Result<()> {
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&dir_path)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            // temp files and anything else that is not a 38 hex suffix
            if file_name.len() != OBJECT_ID_LENGTH - 2 || !accept(&file_name) {
                continue;
            }
            if let Ok(object_id) = ObjectId::try_parse(&format!("{dir_name}{file_name}")) {
                matches.push(object_id);
            }
        }

        Ok(())
    }

    /// Validate `<type> <size>\0` and return the payload after it
    fn split_header(object_id: &ObjectId, content: Bytes) -> Result<(ObjectType, Bytes)> {
        let corrupt = |reason: &str| Error::CorruptObject(format!("{object_id}: {reason}"));

        let space = content
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| corrupt("missing space in header"))?;
        let nul = content[space..]
            .iter()
            .position(|&b| b == 0)
            .map(|position| space + position)
            .ok_or_else(|| corrupt("missing NUL in header"))?;

        let size = std::str::from_utf8(&content[space + 1..nul])
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| corrupt("non-numeric size in header"))?;

        let payload = content.slice(nul + 1..);
        if payload.len() != size {
            return Err(corrupt(&format!(
                "declared size {size} but payload has {} bytes",
                payload.len()
            )));
        }

        let object_type =
            ObjectType::try_from(String::from_utf8_lossy(&content[..space]).as_ref())?;

        Ok((object_type, payload))
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, content: &[u8]) -> Result<()> {
        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let compressed = Self::compress(content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)?;
        file.write_all(&compressed)?;
        drop(file);

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path)?;

        Ok(())
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        Ok(encoder.finish()?)
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
